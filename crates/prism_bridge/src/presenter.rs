//! # Presenter Session
//!
//! The requesting side of the bridge. The presenter owns the headset,
//! publishes `SystemState` (display descriptor + live pose), and blocks in
//! [`PresenterSession::request_frame`] until the producer acknowledges the
//! exact request it just issued.
//!
//! ## The handshake
//!
//! ```text
//! presenter                          producer
//! ────────────────────────────────────────────────────────────
//! write pose, input_frame_id = k
//! push SystemState ──────────────►  (sleeping on browser signal)
//! signal browser slot ───────────►  wake, snapshot SystemState
//! lock browser slot, wait ◄──────   render frame for k
//!   wake, snapshot               ◄  store layer {input=k, frame=n},
//!   input == k? accept              notify
//! input_frame_id = k + 1
//! ```
//!
//! The `input_frame_id` match is the sole admission criterion among
//! published layers: a wake whose snapshot carries an older identifier is
//! a stale acknowledgment and loops again, and a zeroed slot no producer
//! has ever written acknowledges nothing (its identifier of 0 would
//! otherwise collide with the first request). Because the identifier is
//! strictly increasing and only the presenter advances it, no other
//! ordering is needed.

use std::sync::Arc;

use prism_shared::caps::{DeviceCapability, Eye};
use prism_shared::math::{Mat4, Quat, Vec3};
use prism_shared::wire::{BrowserState, LayerEyeRect, LayerKind, SystemState};

use crate::config::HandshakeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::region::SharedRegion;

/// What a completed frame request hands back to the render frontend.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameResult {
    /// Opaque render-target handle published by the producer.
    pub surface_handle: u64,
    /// Left eye rectangle within the surface.
    pub left_eye: LayerEyeRect,
    /// Right eye rectangle within the surface.
    pub right_eye: LayerEyeRect,
}

/// The presenter's end of the shared region.
///
/// Keeps local mirrors of both payloads: the `SystemState` mirror is the
/// staging area for descriptor/pose mutations until the next push, and the
/// `BrowserState` mirror is the snapshot all derived queries
/// ([`Self::is_presenting`], [`Self::is_first_presenting_frame`]) answer
/// from. Pushing new system state never changes the derived queries; only
/// a pull does.
pub struct PresenterSession {
    region: Arc<SharedRegion>,
    /// Local mirror, visible to the producer only after a push.
    system: SystemState,
    /// Local mirror of the most recently pulled producer state.
    browser: BrowserState,
    /// Device-side capability set as supplied by capability discovery.
    capabilities: DeviceCapability,
    /// Per-eye translation from the head center, for view matrices.
    eye_offsets: [Vec3; 2],
    config: HandshakeConfig,
}

impl PresenterSession {
    /// Creates a session over `region` and publishes the initial state
    /// (connected, mounted, enumeration complete, identity views).
    ///
    /// # Errors
    ///
    /// [`BridgeError::LayoutMismatch`] if the region was built against a
    /// different layout revision.
    pub fn new(region: Arc<SharedRegion>, config: HandshakeConfig) -> BridgeResult<Self> {
        region.validate()?;

        let mut system = SystemState::default();
        system.display.is_connected = 1;
        system.display.is_mounted = 1;
        system.enumeration_completed = 1;
        system.sensor.orientation = Quat::IDENTITY;
        system.sensor.left_view = Mat4::IDENTITY;
        system.sensor.right_view = Mat4::IDENTITY;

        let session = Self {
            region,
            system,
            browser: BrowserState::default(),
            capabilities: DeviceCapability::empty(),
            eye_offsets: [Vec3::ZERO; 2],
            config,
        };
        session.push_system_state();
        Ok(session)
    }

    /// Sets the display name on the local mirror. Empty names are
    /// ignored; long names are truncated to the wire buffer.
    pub fn set_device_name(&mut self, name: &str) {
        self.system.display.set_name(name);
    }

    /// Translates and records the device capability set. The wire mask is
    /// echoed into the sensor flags so the producer sees the same set on
    /// both halves of the payload.
    pub fn set_capability_flags(&mut self, capabilities: DeviceCapability) {
        let mask = capabilities.to_wire_mask();
        self.capabilities = capabilities;
        self.system.display.capability_mask = mask;
        self.system.sensor.flags = mask;
    }

    /// Sets one eye's field of view, in degrees from the view axis.
    pub fn set_field_of_view(
        &mut self,
        eye: Eye,
        left_degrees: f32,
        right_degrees: f32,
        up_degrees: f32,
        down_degrees: f32,
    ) {
        let fov = &mut self.system.display.eye_fov[eye.index()];
        fov.up_degrees = up_degrees;
        fov.right_degrees = right_degrees;
        fov.down_degrees = down_degrees;
        fov.left_degrees = left_degrees;
    }

    /// Sets one eye's translation from the head center.
    pub fn set_eye_offset(&mut self, eye: Eye, offset: Vec3) {
        self.system.display.eye_translation[eye.index()] = offset;
        self.eye_offsets[eye.index()] = offset;
    }

    /// Sets the per-eye render target resolution in pixels.
    pub fn set_eye_resolution(&mut self, width: i32, height: i32) {
        self.system.display.eye_resolution_width = width;
        self.system.display.eye_resolution_height = height;
    }

    /// The device capability set last supplied to the session.
    #[must_use]
    pub fn capabilities(&self) -> DeviceCapability {
        self.capabilities
    }

    /// Copies the local `SystemState` mirror into the shared slot, making
    /// the latest descriptor/pose visible to the producer. Non-blocking
    /// beyond the short lock hold.
    pub fn push_system_state(&self) {
        self.region.lock_system().store(&self.system);
    }

    /// Copies the shared `BrowserState` into the local mirror. Used
    /// opportunistically to observe producer status without requesting a
    /// frame (e.g. to notice that presentation just ended).
    pub fn pull_browser_state(&mut self) {
        self.browser = self.region.lock_browser().snapshot();
    }

    /// Whether presentation mode is active, derived from the last
    /// *pulled* `BrowserState`: true iff the primary layer is stereo
    /// immersive.
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.browser.primary_layer().layer_kind() == LayerKind::StereoImmersive
    }

    /// True exactly while presenting and no frame has been submitted yet
    /// (primary layer `frame_id == 0`). The caller uses this to run
    /// one-time setup per presentation session.
    #[must_use]
    pub fn is_first_presenting_frame(&self) -> bool {
        self.is_presenting() && self.browser.primary_layer().frame_id == 0
    }

    /// The identifier the next request will be issued under.
    #[must_use]
    pub fn input_frame_id(&self) -> u64 {
        self.system.sensor.input_frame_id
    }

    /// Frame identifier of the most recent accepted acknowledgment.
    #[must_use]
    pub fn last_submitted_frame_id(&self) -> u64 {
        self.system.display.last_submitted_frame_id
    }

    /// Issues a frame request for `head_transform` and blocks until the
    /// producer acknowledges this exact request.
    ///
    /// Stale acknowledgments (an `input_frame_id` older than the one just
    /// published) and spurious wakes loop again; the presenter never
    /// presents an old frame as current.
    ///
    /// # Errors
    ///
    /// [`BridgeError::ProducerUnresponsive`] when
    /// `missed_cycle_limit` consecutive wait intervals elapse without a
    /// matching acknowledgment. The outstanding `input_frame_id` is not
    /// consumed: the next call republishes the same request identifier.
    pub fn request_frame(&mut self, head_transform: &Mat4) -> BridgeResult<FrameResult> {
        self.system.sensor.orientation = Quat::from_rotation(head_transform);
        self.system.sensor.position = head_transform.translation();
        self.system.sensor.left_view =
            *head_transform * Mat4::from_translation(self.eye_offsets[Eye::Left.index()]);
        self.system.sensor.right_view =
            *head_transform * Mat4::from_translation(self.eye_offsets[Eye::Right.index()]);

        self.push_system_state();
        // Wake a producer that may be blocked waiting for new system state.
        self.region.signal_browser();

        let request_id = self.system.sensor.input_frame_id;
        let mut slot = self.region.lock_browser();
        let mut missed_cycles = 0u32;
        loop {
            tracing::trace!(request_id, "waiting for frame acknowledgment");
            let timed_out = slot.wait(Some(self.config.wait_interval()));
            self.browser = slot.snapshot();

            let layer = *self.browser.primary_layer();
            tracing::trace!(
                request_id,
                acknowledged_input = layer.input_frame_id,
                frame_id = layer.frame_id,
                "frame acknowledgment snapshot"
            );
            // A zeroed, never-written slot has input_frame_id 0, which
            // collides with the first request; only published layers can
            // acknowledge.
            if layer.is_published() && layer.input_frame_id == request_id {
                self.system.display.last_submitted_frame_id = layer.frame_id;
                self.system.display.last_submitted_frame_successful = 1;
                break;
            }

            if timed_out {
                missed_cycles += 1;
                if let Some(limit) = self.config.missed_cycle_limit {
                    if missed_cycles >= limit {
                        drop(slot);
                        tracing::warn!(request_id, missed_cycles, "producer unresponsive");
                        return Err(BridgeError::ProducerUnresponsive { missed_cycles });
                    }
                }
            }
        }
        // Prepare the identifier for the next request.
        self.system.sensor.input_frame_id += 1;
        drop(slot);

        Ok(self.frame_result())
    }

    /// Extracts the renderable surface descriptor from the current
    /// `BrowserState` mirror's primary layer.
    #[must_use]
    pub fn frame_result(&self) -> FrameResult {
        let layer = self.browser.primary_layer();
        FrameResult {
            surface_handle: layer.texture_handle,
            left_eye: layer.left_eye_rect,
            right_eye: layer.right_eye_rect,
        }
    }

    /// Forces an end to presentation: bumps the presenting generation and
    /// publishes it so the producer abandons any in-flight presentation on
    /// its next read. Does not block or wait for acknowledgment.
    pub fn stop_presenting(&mut self) {
        self.system.display.presenting_generation =
            self.system.display.presenting_generation.wrapping_add(1);
        self.push_system_state();
        tracing::debug!(
            generation = self.system.display.presenting_generation,
            "presentation stop requested"
        );
    }
}
