//! # Presenter Loop
//!
//! Per-tick orchestration of the display facade. Every tick runs the same
//! shape:
//!
//! ```text
//! tick(head, hooks)
//!   ├── paused?            -> Idle (nothing moves, gestures stay queued)
//!   ├── drain gestures     -> hooks.on_gesture, in order, bounded
//!   ├── pull producer state
//!   ├── presenting?
//!   │     ├── yes: first-frame hook (once per session),
//!   │     │        push pose, hooks.draw_immersive(result)
//!   │     └── no:  hooks.draw_world, publish state
//!   └── TickOutcome
//! ```
//!
//! The loop decides *when*; the hooks decide *what*. Rendering, compositor
//! control and gesture reactions all live behind [`TickHooks`], so this
//! module stays free of GPU and windowing concerns.

use std::sync::Arc;

use prism_bridge::{BridgeResult, FrameResult, SharedRegion};
use prism_shared::math::Mat4;

use crate::config::PrismConfig;
use crate::display::ImmersiveDisplay;
use crate::events::{GestureEvent, GestureQueue, GestureSender};

/// What the enclosing application plugs into the loop.
///
/// Default implementations make every hook optional except the two draw
/// paths.
pub trait TickHooks {
    /// One world-mode frame (browser UI, environment).
    fn draw_world(&mut self);

    /// One immersive frame: blit `frame` to the device.
    fn draw_immersive(&mut self, frame: &FrameResult);

    /// Runs once per presentation session, before the first immersive
    /// frame (e.g. pausing an external compositor).
    fn on_first_presenting_frame(&mut self) {}

    /// A gesture drained from the queue this tick.
    fn on_gesture(&mut self, gesture: GestureEvent) {
        let _ = gesture;
    }
}

/// Which path a tick took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Presentation active: a frame was requested and drawn.
    Immersive,
    /// World mode: the application drew, state was published.
    World,
    /// The loop is paused; nothing ran.
    Idle,
}

/// Owns the display facade and the gesture queue, and sequences one tick.
pub struct PresenterLoop {
    display: ImmersiveDisplay,
    gestures: GestureQueue,
    paused: bool,
    /// Latched when the first-frame hook fires; cleared when the session
    /// leaves presentation mode.
    first_frame_fired: bool,
}

impl PresenterLoop {
    /// Builds the loop over `region` from a loaded configuration:
    /// handshake knobs, queue sizing, and the optional startup descriptor.
    ///
    /// # Errors
    ///
    /// Propagates the region's layout validation failure.
    pub fn new(region: Arc<SharedRegion>, config: &PrismConfig) -> BridgeResult<Self> {
        let mut display = ImmersiveDisplay::new(region, config.handshake)?;
        if let Some(descriptor) = &config.display {
            display.apply_descriptor(descriptor);
        }
        Ok(Self {
            display,
            gestures: GestureQueue::new(&config.events),
            paused: false,
            first_frame_fired: false,
        })
    }

    /// The display facade, for descriptor updates after startup.
    pub fn display_mut(&mut self) -> &mut ImmersiveDisplay {
        &mut self.display
    }

    /// A handle for platform callback threads to enqueue gestures.
    #[must_use]
    pub fn gesture_sender(&self) -> GestureSender {
        self.gestures.sender()
    }

    /// Stops ticking work; gestures keep queueing and are drained on the
    /// first tick after [`Self::resume`].
    pub fn pause(&mut self) {
        self.paused = true;
        tracing::debug!("presenter loop paused");
    }

    /// Resumes ticking.
    pub fn resume(&mut self) {
        self.paused = false;
        tracing::debug!("presenter loop resumed");
    }

    /// Whether the loop is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Runs one tick with the latest head pose.
    ///
    /// # Errors
    ///
    /// Propagates `ProducerUnresponsive` from the immersive path when a
    /// bounded wait is configured. The tick can be retried: the abandoned
    /// request stays outstanding.
    pub fn tick(
        &mut self,
        head_transform: &Mat4,
        hooks: &mut impl TickHooks,
    ) -> BridgeResult<TickOutcome> {
        if self.paused {
            return Ok(TickOutcome::Idle);
        }

        for gesture in self.gestures.drain_tick() {
            hooks.on_gesture(gesture);
        }

        self.display.pull_producer_state();
        if self.display.query_presenting() {
            if !self.first_frame_fired {
                self.first_frame_fired = true;
                tracing::debug!("first presenting frame");
                hooks.on_first_presenting_frame();
            }
            let frame = self.display.push_pose(head_transform)?;
            hooks.draw_immersive(&frame);
            Ok(TickOutcome::Immersive)
        } else {
            self.first_frame_fired = false;
            hooks.draw_world();
            self.display.publish_state();
            Ok(TickOutcome::World)
        }
    }
}
