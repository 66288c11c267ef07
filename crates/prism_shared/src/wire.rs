//! The versioned region payload layout.
//!
//! Two payloads cross the boundary: [`SystemState`] (presenter → producer:
//! display descriptor + live pose + request identifiers) and
//! [`BrowserState`] (producer → presenter: layer descriptors carrying the
//! acknowledgment identifiers). Both are fixed-layout `#[repr(C)]` Pod
//! structs and are only ever moved as whole-struct copies under a lock.
//!
//! The layout is versioned: bump [`WIRE_VERSION`] whenever a field is
//! added, removed or reordered. A peer that disagrees on version or byte
//! size must be rejected, never adapted.

use bytemuck::{Pod, Zeroable};

use crate::math::{Mat4, Quat, Vec3};

/// Region layout revision. Bump on any layout change.
pub const WIRE_VERSION: u32 = 1;

/// Capacity of the display name buffer, including the NUL terminator.
pub const DISPLAY_NAME_MAX_LEN: usize = 64;

/// Fixed number of layer slots in [`BrowserState`].
pub const MAX_LAYER_COUNT: usize = 8;

/// Wire capability bits carried in [`DisplayState::capability_mask`].
///
/// These are the on-the-wire positions; the API-side bitset lives in
/// [`crate::caps::DeviceCapability`] and is translated flag by flag.
pub mod capability_bits {
    /// Positional tracking
    pub const POSITION: u32 = 1 << 0;
    /// Orientation tracking
    pub const ORIENTATION: u32 = 1 << 1;
    /// Presentation support
    pub const PRESENT: u32 = 1 << 2;
    /// Angular acceleration reporting
    pub const ANGULAR_ACCELERATION: u32 = 1 << 3;
    /// Linear acceleration reporting
    pub const LINEAR_ACCELERATION: u32 = 1 << 4;
    /// Stage (room-scale) parameters
    pub const STAGE_PARAMETERS: u32 = 1 << 5;
    /// Mount/unmount detection
    pub const MOUNT_DETECTION: u32 = 1 << 6;
}

/// Per-eye field of view, in degrees from the view axis.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct EyeFov {
    /// Degrees up from the view axis
    pub up_degrees: f32,
    /// Degrees right from the view axis
    pub right_degrees: f32,
    /// Degrees down from the view axis
    pub down_degrees: f32,
    /// Degrees left from the view axis
    pub left_degrees: f32,
}

/// Display descriptor half of [`SystemState`].
///
/// Written by the presenter, read by the producer as a locked snapshot.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DisplayState {
    /// Frame identifier of the most recent accepted acknowledgment.
    pub last_submitted_frame_id: u64,
    /// Wire capability mask (see [`capability_bits`]).
    pub capability_mask: u32,
    /// Wire bool: device connected.
    pub is_connected: u32,
    /// Wire bool: device mounted on the user's head.
    pub is_mounted: u32,
    /// Wire bool: outcome of the most recent completed request.
    pub last_submitted_frame_successful: u32,
    /// Incremented each time the presenter forces presentation to end.
    pub presenting_generation: u32,
    /// Per-eye render target width in pixels.
    pub eye_resolution_width: i32,
    /// Per-eye render target height in pixels.
    pub eye_resolution_height: i32,
    /// Per-eye field of view, indexed by [`crate::caps::Eye`].
    pub eye_fov: [EyeFov; 2],
    /// Per-eye translation from the head center, indexed by eye.
    pub eye_translation: [Vec3; 2],
    /// Display name, NUL-terminated, truncated to capacity.
    pub display_name: [u8; DISPLAY_NAME_MAX_LEN],
    /// Explicit tail padding; keep zeroed.
    pub _pad: [u8; 4],
}

impl DisplayState {
    /// Copies `name` into the fixed buffer, truncating to capacity and
    /// guaranteeing NUL termination. An empty name leaves the buffer
    /// untouched.
    pub fn set_name(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        let bytes = name.as_bytes();
        let len = bytes.len().min(DISPLAY_NAME_MAX_LEN - 1);
        self.display_name[..len].copy_from_slice(&bytes[..len]);
        self.display_name[len..].fill(0);
    }

    /// The display name up to the first NUL.
    #[must_use]
    pub fn name(&self) -> &str {
        let end = self
            .display_name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(DISPLAY_NAME_MAX_LEN);
        std::str::from_utf8(&self.display_name[..end]).unwrap_or("")
    }
}

/// Live pose half of [`SystemState`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SensorState {
    /// Monotonically increasing request identifier; incremented exactly
    /// once per completed frame request. The correctness anchor of the
    /// handshake.
    pub input_frame_id: u64,
    /// Echo of the wire capability mask.
    pub flags: u32,
    /// Explicit padding; keep zeroed.
    pub _pad0: u32,
    /// Head orientation.
    pub orientation: Quat,
    /// Head position.
    pub position: Vec3,
    /// Explicit padding; keep zeroed.
    pub _pad1: u32,
    /// Left eye view matrix, row-major.
    pub left_view: Mat4,
    /// Right eye view matrix, row-major.
    pub right_view: Mat4,
}

/// Presenter → producer payload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SystemState {
    /// Display descriptor and request outcome fields.
    pub display: DisplayState,
    /// Live pose and request identifier.
    pub sensor: SensorState,
    /// Wire bool: device enumeration finished (set once at startup).
    pub enumeration_completed: u32,
    /// Explicit tail padding; keep zeroed.
    pub _pad: u32,
}

/// A renderable surface rectangle for one eye, `(x, y, width, height)`.
///
/// Units are the producer's convention (normalized or pixels).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LayerEyeRect {
    /// Rectangle origin X
    pub x: f32,
    /// Rectangle origin Y
    pub y: f32,
    /// Rectangle width
    pub width: f32,
    /// Rectangle height
    pub height: f32,
}

/// Layer kind discriminator.
///
/// Presentation mode is derived state: it is active iff the primary
/// layer's kind is [`LayerKind::StereoImmersive`].
#[repr(u32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayerKind {
    /// No layer / presentation idle.
    #[default]
    None = 0,
    /// Stereo immersive presentation layer.
    StereoImmersive = 1,
}

impl LayerKind {
    /// Decodes a wire discriminant. Unknown values read as `None` so a
    /// newer producer degrades to "not presenting" instead of tearing.
    #[must_use]
    pub fn from_wire(raw: u32) -> Self {
        match raw {
            1 => Self::StereoImmersive,
            _ => Self::None,
        }
    }
}

/// One layer descriptor slot in [`BrowserState`].
///
/// Owned by the producer; the presenter reads it only as a locked copy.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LayerState {
    /// Producer-assigned, monotonically increasing frame identifier.
    /// Zero means "no frame submitted yet".
    pub frame_id: u64,
    /// The presenter request this layer was computed from.
    pub input_frame_id: u64,
    /// Opaque render-target handle.
    pub texture_handle: u64,
    /// Wire discriminant of [`LayerKind`].
    pub kind: u32,
    /// Explicit padding; keep zeroed.
    pub _pad: u32,
    /// Left eye rectangle.
    pub left_eye_rect: LayerEyeRect,
    /// Right eye rectangle.
    pub right_eye_rect: LayerEyeRect,
}

impl LayerState {
    /// The decoded layer kind.
    #[must_use]
    pub fn layer_kind(&self) -> LayerKind {
        LayerKind::from_wire(self.kind)
    }

    /// Whether a producer has ever written this slot.
    ///
    /// A zeroed slot is idle and carries no acknowledgment, even though
    /// its `input_frame_id` of 0 collides with the first request. Every
    /// legitimate publication is distinguishable: presentation start
    /// carries the immersive kind, and every later write carries a
    /// nonzero `frame_id`.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.frame_id != 0 || self.layer_kind() != LayerKind::None
    }
}

/// Producer → presenter payload: a fixed, ordered set of layer slots.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BrowserState {
    /// Layer slots; slot 0 is the primary layer.
    pub layers: [LayerState; MAX_LAYER_COUNT],
}

impl BrowserState {
    /// The primary layer (slot 0), which drives presentation mode.
    #[must_use]
    pub fn primary_layer(&self) -> &LayerState {
        &self.layers[0]
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Default for SensorState {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Layout locks: if one of these fires, the layout changed and
    // WIRE_VERSION must be bumped together with both peers.
    #[test]
    fn test_wire_sizes_are_locked() {
        assert_eq!(std::mem::size_of::<EyeFov>(), 16);
        assert_eq!(std::mem::size_of::<LayerEyeRect>(), 16);
        assert_eq!(std::mem::size_of::<DisplayState>(), 160);
        assert_eq!(std::mem::size_of::<SensorState>(), 176);
        assert_eq!(std::mem::size_of::<SystemState>(), 344);
        assert_eq!(std::mem::size_of::<LayerState>(), 64);
        assert_eq!(
            std::mem::size_of::<BrowserState>(),
            64 * MAX_LAYER_COUNT
        );
    }

    #[test]
    fn test_display_name_roundtrip() {
        let mut display = DisplayState::default();
        display.set_name("PRISM HMD");
        assert_eq!(display.name(), "PRISM HMD");
    }

    #[test]
    fn test_display_name_truncates_and_terminates() {
        let mut display = DisplayState::default();
        let long = "x".repeat(DISPLAY_NAME_MAX_LEN * 2);
        display.set_name(&long);
        assert_eq!(display.name().len(), DISPLAY_NAME_MAX_LEN - 1);
        assert_eq!(display.display_name[DISPLAY_NAME_MAX_LEN - 1], 0);
    }

    #[test]
    fn test_empty_name_is_ignored() {
        let mut display = DisplayState::default();
        display.set_name("headset");
        display.set_name("");
        assert_eq!(display.name(), "headset");
    }

    #[test]
    fn test_unknown_layer_kind_reads_as_none() {
        assert_eq!(LayerKind::from_wire(0), LayerKind::None);
        assert_eq!(LayerKind::from_wire(1), LayerKind::StereoImmersive);
        assert_eq!(LayerKind::from_wire(7), LayerKind::None);
    }

    #[test]
    fn test_zeroed_browser_state_is_idle() {
        let browser = BrowserState::default();
        assert_eq!(browser.primary_layer().layer_kind(), LayerKind::None);
        assert_eq!(browser.primary_layer().frame_id, 0);
    }

    #[test]
    fn test_zeroed_layer_is_not_a_publication() {
        assert!(!LayerState::default().is_published());
    }

    #[test]
    fn test_every_producer_write_shape_is_a_publication() {
        // Presentation start: immersive kind, sentinel frame id.
        let begin = LayerState {
            kind: LayerKind::StereoImmersive as u32,
            ..LayerState::default()
        };
        assert!(begin.is_published());

        // Frame submission: immersive kind, assigned frame id.
        let submitted = LayerState {
            frame_id: 1,
            kind: LayerKind::StereoImmersive as u32,
            ..LayerState::default()
        };
        assert!(submitted.is_published());

        // Presentation end: idle kind, but a fresh frame id.
        let ended = LayerState {
            frame_id: 2,
            ..LayerState::default()
        };
        assert!(ended.is_published());
    }
}
