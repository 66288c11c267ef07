//! # Producer Session
//!
//! The fulfilling side of the bridge. The producer sleeps on the browser
//! slot's signal, snapshots `SystemState` when woken, renders a result
//! bound to the `input_frame_id` it observed, and publishes a layer
//! descriptor carrying that identifier plus a freshly assigned,
//! monotonically increasing `frame_id`.
//!
//! Ordering obligations: a given `input_frame_id` may be fulfilled at most
//! once, never after a newer request has been fulfilled, and `frame_id`
//! never regresses. All three are enforced here.

use std::sync::Arc;
use std::time::Duration;

use prism_shared::wire::{LayerEyeRect, LayerKind, LayerState, SystemState};

use crate::error::{BridgeError, BridgeResult};
use crate::region::SharedRegion;

/// A rendered result ready for publication.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSubmission {
    /// Opaque render-target handle the presenter will blit from.
    pub texture_handle: u64,
    /// Left eye rectangle within the surface.
    pub left_eye_rect: LayerEyeRect,
    /// Right eye rectangle within the surface.
    pub right_eye_rect: LayerEyeRect,
}

/// The producer's end of the shared region.
pub struct ProducerSession {
    region: Arc<SharedRegion>,
    /// Next frame identifier to assign. Starts at 1; 0 is the sentinel
    /// for "no frame submitted yet".
    next_frame_id: u64,
    /// High-water mark of fulfilled requests. Request ids at or below
    /// this are rejected: the presenter only moves forward.
    last_fulfilled_input: Option<u64>,
}

impl ProducerSession {
    /// Attaches to an existing region.
    ///
    /// # Errors
    ///
    /// [`BridgeError::LayoutMismatch`] if the region was built against a
    /// different layout revision.
    pub fn attach(region: Arc<SharedRegion>) -> BridgeResult<Self> {
        region.validate()?;
        Ok(Self {
            region,
            next_frame_id: 1,
            last_fulfilled_input: None,
        })
    }

    /// Copies the presenter-owned `SystemState` out under its lock.
    #[must_use]
    pub fn pull_system_state(&self) -> SystemState {
        self.region.lock_system().snapshot()
    }

    /// Blocks until the presenter signals new system state (or the
    /// interval elapses), then returns a fresh `SystemState` snapshot.
    #[must_use]
    pub fn wait_for_request(&self, interval: Option<Duration>) -> SystemState {
        {
            let mut slot = self.region.lock_browser();
            let _timed_out = slot.wait(interval);
        }
        self.pull_system_state()
    }

    /// Marks presentation as active before any frame has been rendered:
    /// publishes a stereo-immersive primary layer with the sentinel
    /// `frame_id` of 0. The presenter reports this as the first
    /// presenting frame until a real submission lands.
    pub fn begin_presentation(&mut self, input_frame_id: u64) {
        self.publish_primary(LayerState {
            frame_id: 0,
            input_frame_id,
            kind: LayerKind::StereoImmersive as u32,
            ..LayerState::default()
        });
        tracing::debug!(input_frame_id, "presentation started");
    }

    /// Publishes a rendered result for the request identified by
    /// `input_frame_id` and wakes the presenter. Returns the assigned
    /// frame identifier.
    ///
    /// # Errors
    ///
    /// [`BridgeError::DuplicateSubmission`] if this request, or a newer
    /// one, was already fulfilled.
    pub fn submit_frame(
        &mut self,
        input_frame_id: u64,
        submission: &FrameSubmission,
    ) -> BridgeResult<u64> {
        if self
            .last_fulfilled_input
            .is_some_and(|last| input_frame_id <= last)
        {
            return Err(BridgeError::DuplicateSubmission { input_frame_id });
        }

        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;

        self.publish_primary(LayerState {
            frame_id,
            input_frame_id,
            texture_handle: submission.texture_handle,
            kind: LayerKind::StereoImmersive as u32,
            left_eye_rect: submission.left_eye_rect,
            right_eye_rect: submission.right_eye_rect,
            ..LayerState::default()
        });
        self.last_fulfilled_input = Some(input_frame_id);
        tracing::trace!(input_frame_id, frame_id, "frame submitted");
        Ok(frame_id)
    }

    /// Ends presentation: publishes an idle primary layer carrying
    /// `input_frame_id`, so a presenter blocked on that request wakes and
    /// observes the mode change on the same tick.
    pub fn end_presentation(&mut self, input_frame_id: u64) {
        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;
        self.publish_primary(LayerState {
            frame_id,
            input_frame_id,
            kind: LayerKind::None as u32,
            ..LayerState::default()
        });
        // Ending presentation fulfills the request it carries.
        self.last_fulfilled_input = self
            .last_fulfilled_input
            .max(Some(input_frame_id));
        tracing::debug!(input_frame_id, "presentation ended");
    }

    /// Stores `layer` into slot 0 under the browser lock and notifies.
    /// Secondary slots are left untouched.
    fn publish_primary(&self, layer: LayerState) {
        let mut slot = self.region.lock_browser();
        let mut state = slot.snapshot();
        state.layers[0] = layer;
        slot.store(&state);
        slot.notify();
    }
}
