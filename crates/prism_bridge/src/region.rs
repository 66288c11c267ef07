//! # Shared Region
//!
//! The transport between the presenter and the producer: one versioned,
//! fixed-size block holding two independently-guarded payload slots.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 SharedRegion                 │
//! │  version / size  (layout handshake)          │
//! │                                              │
//! │  ┌──────────────────┐  ┌──────────────────┐  │
//! │  │ Mutex + Condvar  │  │ Mutex + Condvar  │  │
//! │  │   SystemState    │  │   BrowserState   │  │
//! │  │ (presenter-owned)│  │ (producer-owned) │  │
//! │  └──────────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Each slot has exactly one writer: the presenter mutates `SystemState`,
//! the producer mutates `BrowserState`. That single-writer rule is what
//! makes two independent locks sufficient; a single lock over both slots
//! would serialize unrelated traffic for nothing.
//!
//! Access is only possible through scoped slot guards that copy whole
//! structures in and out. No API hands out a reference into the payload
//! that survives the lock scope, so a torn read is unrepresentable.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex, MutexGuard};
use prism_shared::wire::{BrowserState, SystemState, WIRE_VERSION};

use crate::error::{BridgeError, BridgeResult};

/// The shared block. Allocated once at startup, never resized; only the
/// payload fields are overwritten in place.
pub struct SharedRegion {
    /// Layout revision stamped at construction.
    version: u32,
    /// Exact byte size of this structure on the building target.
    size: u32,
    system: Mutex<SystemState>,
    system_signal: Condvar,
    browser: Mutex<BrowserState>,
    browser_signal: Condvar,
}

impl SharedRegion {
    /// Creates a region with zero-initialized payloads and the current
    /// layout constants stamped into the header.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::with_layout(
            WIRE_VERSION,
            std::mem::size_of::<Self>() as u32,
        ))
    }

    fn with_layout(version: u32, size: u32) -> Self {
        Self {
            version,
            size,
            system: Mutex::new(SystemState::default()),
            system_signal: Condvar::new(),
            browser: Mutex::new(BrowserState::default()),
            browser_signal: Condvar::new(),
        }
    }

    /// The layout revision stamped into this region.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The byte size stamped into this region.
    #[must_use]
    pub fn size_bytes(&self) -> u32 {
        self.size
    }

    /// Checks the layout handshake. A version or size disagreement is a
    /// hard incompatibility: the region must be rejected, not adapted.
    pub fn validate(&self) -> BridgeResult<()> {
        let expected_size = std::mem::size_of::<Self>() as u32;
        if self.version != WIRE_VERSION || self.size != expected_size {
            return Err(BridgeError::LayoutMismatch {
                version: self.version,
                size: self.size,
                expected_version: WIRE_VERSION,
                expected_size,
            });
        }
        Ok(())
    }

    /// Locks the presenter-owned slot.
    #[must_use]
    pub fn lock_system(&self) -> SystemSlot<'_> {
        Slot {
            guard: self.system.lock(),
            signal: &self.system_signal,
        }
    }

    /// Locks the presenter-owned slot without blocking; `None` under
    /// contention (the caller skips this tick and retries on the next).
    #[must_use]
    pub fn try_lock_system(&self) -> Option<SystemSlot<'_>> {
        self.system.try_lock().map(|guard| Slot {
            guard,
            signal: &self.system_signal,
        })
    }

    /// Locks the producer-owned slot.
    #[must_use]
    pub fn lock_browser(&self) -> BrowserSlot<'_> {
        Slot {
            guard: self.browser.lock(),
            signal: &self.browser_signal,
        }
    }

    /// Locks the producer-owned slot without blocking.
    #[must_use]
    pub fn try_lock_browser(&self) -> Option<BrowserSlot<'_>> {
        self.browser.try_lock().map(|guard| Slot {
            guard,
            signal: &self.browser_signal,
        })
    }

    /// Wakes anything blocked on the producer-owned slot's signal
    /// (lock, notify, unlock).
    pub fn signal_browser(&self) {
        let slot = self.lock_browser();
        slot.notify();
    }
}

/// Scoped guard over one payload slot.
///
/// Exposes whole-struct copies only; the payload reference never escapes.
pub struct Slot<'a, T: Copy> {
    guard: MutexGuard<'a, T>,
    signal: &'a Condvar,
}

/// Guard over the presenter-owned `SystemState` slot.
pub type SystemSlot<'a> = Slot<'a, SystemState>;

/// Guard over the producer-owned `BrowserState` slot.
pub type BrowserSlot<'a> = Slot<'a, BrowserState>;

impl<T: Copy> Slot<'_, T> {
    /// Copies the shared payload out.
    #[must_use]
    pub fn snapshot(&self) -> T {
        *self.guard
    }

    /// Copies `value` into the shared payload.
    pub fn store(&mut self, value: &T) {
        *self.guard = *value;
    }

    /// Wakes all waiters on this slot's signal.
    pub fn notify(&self) {
        self.signal.notify_all();
    }

    /// Blocks on this slot's signal, releasing the lock while waiting.
    /// Returns `true` if the wait timed out rather than being signaled.
    /// Spurious wakes are possible either way; callers must re-check.
    pub fn wait(&mut self, interval: Option<Duration>) -> bool {
        match interval {
            Some(interval) => self.signal.wait_for(&mut self.guard, interval).timed_out(),
            None => {
                self.signal.wait(&mut self.guard);
                false
            }
        }
    }
}
