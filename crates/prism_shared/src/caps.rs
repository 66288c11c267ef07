//! Device capability bitset and eye indexing.
//!
//! Capability discovery hands the presenter a [`DeviceCapability`] set;
//! [`DeviceCapability::to_wire_mask`] translates it flag by flag into the
//! wire representation. Unknown bits are dropped silently, which keeps the
//! translation forward compatible with newer device layers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::wire::capability_bits;

bitflags! {
    /// Capabilities reported by the device/platform layer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DeviceCapability: u32 {
        /// Positional tracking
        const POSITION = 1 << 0;
        /// Orientation tracking
        const ORIENTATION = 1 << 1;
        /// Presentation support
        const PRESENT = 1 << 2;
        /// Angular acceleration reporting
        const ANGULAR_ACCELERATION = 1 << 3;
        /// Linear acceleration reporting
        const LINEAR_ACCELERATION = 1 << 4;
        /// Stage (room-scale) parameters
        const STAGE_PARAMETERS = 1 << 5;
        /// Mount/unmount detection
        const MOUNT_DETECTION = 1 << 6;
    }
}

impl DeviceCapability {
    /// Translates the set into the wire capability mask, flag by flag.
    /// Bits this build does not know about are dropped, not an error.
    #[must_use]
    pub fn to_wire_mask(self) -> u32 {
        let mut mask = 0;
        if self.contains(Self::POSITION) {
            mask |= capability_bits::POSITION;
        }
        if self.contains(Self::ORIENTATION) {
            mask |= capability_bits::ORIENTATION;
        }
        if self.contains(Self::PRESENT) {
            mask |= capability_bits::PRESENT;
        }
        if self.contains(Self::ANGULAR_ACCELERATION) {
            mask |= capability_bits::ANGULAR_ACCELERATION;
        }
        if self.contains(Self::LINEAR_ACCELERATION) {
            mask |= capability_bits::LINEAR_ACCELERATION;
        }
        if self.contains(Self::STAGE_PARAMETERS) {
            mask |= capability_bits::STAGE_PARAMETERS;
        }
        if self.contains(Self::MOUNT_DETECTION) {
            mask |= capability_bits::MOUNT_DETECTION;
        }
        mask
    }
}

/// Eye selector for per-eye display parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eye {
    /// Left eye
    Left,
    /// Right eye
    Right,
}

impl Eye {
    /// Stable index into per-eye arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Both eyes in array order.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_flags_translate_verbatim() {
        let caps = DeviceCapability::POSITION
            | DeviceCapability::ORIENTATION
            | DeviceCapability::PRESENT;
        let mask = caps.to_wire_mask();
        assert_eq!(
            mask,
            capability_bits::POSITION | capability_bits::ORIENTATION | capability_bits::PRESENT
        );
    }

    #[test]
    fn test_unknown_bits_are_dropped() {
        let raw = DeviceCapability::from_bits_retain(DeviceCapability::all().bits() | 0xFF00);
        assert_eq!(raw.to_wire_mask(), DeviceCapability::all().to_wire_mask());
    }

    #[test]
    fn test_empty_set_is_zero_mask() {
        assert_eq!(DeviceCapability::empty().to_wire_mask(), 0);
    }

    #[test]
    fn test_eye_indices_are_stable() {
        assert_eq!(Eye::Left.index(), 0);
        assert_eq!(Eye::Right.index(), 1);
        assert_eq!(Eye::BOTH[0], Eye::Left);
    }
}
