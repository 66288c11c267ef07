//! # Immersive Display Facade
//!
//! What the rest of the application sees of the headset. Wraps the
//! presenter session behind a small surface: apply a descriptor, push a
//! pose, query the presentation mode. The render frontend never touches
//! the shared region or the wire structs directly.

use std::sync::Arc;

use prism_bridge::{BridgeResult, FrameResult, HandshakeConfig, PresenterSession, SharedRegion};
use prism_shared::caps::{DeviceCapability, Eye};
use prism_shared::math::{Mat4, Vec3};
use serde::Deserialize;

/// Per-eye optics as reported by capability discovery.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EyeParameters {
    /// Field of view, in degrees from the view axis: up, right, down, left.
    pub fov_degrees: [f32; 4],
    /// Translation from the head center, in meters.
    pub offset: [f32; 3],
}

impl Default for EyeParameters {
    fn default() -> Self {
        Self {
            fov_degrees: [45.0; 4],
            offset: [0.0; 3],
        }
    }
}

/// Everything capability discovery knows about the device, applied to the
/// session in one step.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayDescriptor {
    /// Human-readable device name. Empty names are ignored downstream.
    pub name: String,
    /// Device capability set.
    pub capabilities: DeviceCapability,
    /// Per-eye render target resolution in pixels: width, height.
    pub eye_resolution: [i32; 2],
    /// Left eye optics.
    pub left_eye: EyeParameters,
    /// Right eye optics.
    pub right_eye: EyeParameters,
}

impl Default for DisplayDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            capabilities: DeviceCapability::ORIENTATION | DeviceCapability::PRESENT,
            eye_resolution: [1440, 1600],
            left_eye: EyeParameters::default(),
            right_eye: EyeParameters::default(),
        }
    }
}

/// The application-facing handle on the headset.
pub struct ImmersiveDisplay {
    session: PresenterSession,
}

impl ImmersiveDisplay {
    /// Opens a display over `region`.
    ///
    /// # Errors
    ///
    /// Propagates the region's layout validation failure.
    pub fn new(region: Arc<SharedRegion>, config: HandshakeConfig) -> BridgeResult<Self> {
        Ok(Self {
            session: PresenterSession::new(region, config)?,
        })
    }

    /// Applies a full descriptor and publishes it in one push, so the
    /// producer observes the new device parameters atomically.
    pub fn apply_descriptor(&mut self, descriptor: &DisplayDescriptor) {
        self.session.set_device_name(&descriptor.name);
        self.session.set_capability_flags(descriptor.capabilities);
        self.session
            .set_eye_resolution(descriptor.eye_resolution[0], descriptor.eye_resolution[1]);
        for (eye, parameters) in [
            (Eye::Left, &descriptor.left_eye),
            (Eye::Right, &descriptor.right_eye),
        ] {
            let [up, right, down, left] = parameters.fov_degrees;
            self.session.set_field_of_view(eye, left, right, up, down);
            self.session
                .set_eye_offset(eye, Vec3::from_array(parameters.offset));
        }
        self.session.push_system_state();
        tracing::debug!(name = %descriptor.name, "display descriptor applied");
    }

    /// Publishes the current descriptor/pose mirror without requesting a
    /// frame (the world-path end of a tick).
    pub fn publish_state(&self) {
        self.session.push_system_state();
    }

    /// Refreshes the producer-state snapshot the mode queries answer from.
    pub fn pull_producer_state(&mut self) {
        self.session.pull_browser_state();
    }

    /// Whether the producer holds presentation mode active, as of the
    /// last [`Self::pull_producer_state`].
    #[must_use]
    pub fn query_presenting(&self) -> bool {
        self.session.is_presenting()
    }

    /// Whether presentation is active but no frame has been rendered yet.
    #[must_use]
    pub fn query_first_presenting_frame(&self) -> bool {
        self.session.is_first_presenting_frame()
    }

    /// Submits the head pose and blocks until the producer acknowledges
    /// this exact request.
    ///
    /// # Errors
    ///
    /// Propagates `ProducerUnresponsive` from the bounded wait, when one
    /// is configured.
    pub fn push_pose(&mut self, head_transform: &Mat4) -> BridgeResult<FrameResult> {
        self.session.request_frame(head_transform)
    }

    /// Tells the producer to abandon presentation. Non-blocking.
    pub fn notify_stop_presenting(&mut self) {
        self.session.stop_presenting();
    }
}
