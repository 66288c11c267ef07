//! # Gesture Event Queue
//!
//! Typed, bounded delivery of platform gestures into the presenter loop.
//!
//! ```text
//! ┌──────────────┐      ┌──────────────┐      ┌────────────────┐
//! │   Platform   │─────>│   Gesture    │─────>│ PresenterLoop  │
//! │  callbacks   │      │    Queue     │      │  (per tick)    │
//! └──────────────┘      └──────────────┘      └────────────────┘
//! ```
//!
//! Callbacks arrive on whatever thread the platform uses; the loop drains
//! on its own tick. The channel is bounded so a stalled loop can never
//! grow memory: a full queue drops the newest event with a warning. The
//! per-tick drain budget keeps a gesture burst from starving the frame.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::Deserialize;

/// A recognized gesture, already classified by the platform layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEvent {
    /// Horizontal swipe toward negative X.
    SwipeLeft,
    /// Horizontal swipe toward positive X.
    SwipeRight,
}

/// Sizing knobs for the gesture queue.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EventQueueConfig {
    /// Maximum gestures in flight before new ones are dropped.
    pub capacity: usize,
    /// Maximum gestures handled per presenter tick.
    pub drain_budget: usize,
}

impl Default for EventQueueConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            drain_budget: 16,
        }
    }
}

/// Bounded, order-preserving gesture queue.
pub struct GestureQueue {
    sender: Sender<GestureEvent>,
    receiver: Receiver<GestureEvent>,
    drain_budget: usize,
}

impl GestureQueue {
    /// Creates a queue with the given sizing.
    #[must_use]
    pub fn new(config: &EventQueueConfig) -> Self {
        let (sender, receiver) = bounded(config.capacity);
        Self {
            sender,
            receiver,
            drain_budget: config.drain_budget,
        }
    }

    /// A cloneable handle for the platform side.
    #[must_use]
    pub fn sender(&self) -> GestureSender {
        GestureSender {
            sender: self.sender.clone(),
        }
    }

    /// Enqueues a gesture from the loop's own thread.
    ///
    /// Returns `false` if the queue was full and the event was dropped.
    pub fn push(&self, event: GestureEvent) -> bool {
        push_inner(&self.sender, event)
    }

    /// Drains at most the configured budget, in arrival order.
    pub fn drain_tick(&self) -> impl Iterator<Item = GestureEvent> + '_ {
        self.receiver.try_iter().take(self.drain_budget)
    }

    /// Gestures currently waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether no gestures are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Handle for pushing gestures from platform callback threads.
#[derive(Clone)]
pub struct GestureSender {
    sender: Sender<GestureEvent>,
}

impl GestureSender {
    /// Enqueues a gesture (non-blocking).
    ///
    /// Returns `false` if the queue was full and the event was dropped.
    pub fn push(&self, event: GestureEvent) -> bool {
        push_inner(&self.sender, event)
    }
}

fn push_inner(sender: &Sender<GestureEvent>, event: GestureEvent) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(dropped)) => {
            tracing::warn!(?dropped, "gesture queue full, event dropped");
            false
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}
