//! # Session Registry
//!
//! Platform callback entry points (JNI-style, C ABI, whatever the host
//! uses) cannot hold Rust references across calls. Instead of a
//! process-wide singleton pointer, each live session registers here and
//! the callbacks carry a [`SessionId`]. An id for a session that has been
//! removed simply resolves to nothing; there is no dangling pointer to
//! misuse.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Stable handle to a registered session. Never reused within a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

/// Registry of live sessions, keyed by [`SessionId`].
pub struct SessionRegistry<T> {
    sessions: Mutex<HashMap<SessionId, T>>,
    next_id: AtomicU64,
}

impl<T> SessionRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers a session and returns its id.
    pub fn insert(&self, session: T) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sessions.lock().insert(id, session);
        id
    }

    /// Runs `f` against the session behind `id`, if it is still live.
    /// The registry lock is held for the duration of `f`.
    pub fn with<R>(&self, id: SessionId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.sessions.lock().get_mut(&id).map(f)
    }

    /// Unregisters and returns the session behind `id`.
    pub fn remove(&self, id: SessionId) -> Option<T> {
        self.sessions.lock().remove(&id)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Whether no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

impl<T> Default for SessionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
