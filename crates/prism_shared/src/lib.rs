//! # PRISM Shared
//!
//! Types that cross the presenter/producer boundary.
//!
//! The presenter loop owns the headset and issues frame requests; the
//! producer loop renders content and fulfills them. Both sides copy these
//! structures in and out of one fixed-layout shared region, so everything
//! in this crate is `#[repr(C)]`, `Pod` and padding-explicit.
//!
//! ## Modules
//!
//! - `math`: fixed-layout vector/quaternion/matrix types
//! - `wire`: the versioned region payload layout
//! - `caps`: device capability bitset and its wire translation

pub mod caps;
pub mod math;
pub mod wire;

// Re-export commonly used types
pub use caps::{DeviceCapability, Eye};
pub use math::{Mat4, Quat, Vec3};
pub use wire::{
    BrowserState, DisplayState, EyeFov, LayerEyeRect, LayerKind, LayerState, SensorState,
    SystemState, DISPLAY_NAME_MAX_LEN, MAX_LAYER_COUNT, WIRE_VERSION,
};
