//! Step events: one time slot of a motion.

use super::direction::Axis;

/// One boolean flag per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisFlags {
    /// X axis flag.
    pub x: bool,
    /// Y axis flag.
    pub y: bool,
    /// Z axis flag.
    pub z: bool,
}

impl AxisFlags {
    /// No axis flagged.
    pub const NONE: Self = Self {
        x: false,
        y: false,
        z: false,
    };

    /// Build flags from an array indexed by [`Axis::index`].
    #[inline]
    pub const fn from_array(flags: [bool; 3]) -> Self {
        Self {
            x: flags[0],
            y: flags[1],
            z: flags[2],
        }
    }

    /// Flag for one axis.
    #[inline]
    pub fn get(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Set the flag for one axis.
    #[inline]
    pub fn set(&mut self, axis: Axis, value: bool) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    /// Invert the flag for one axis.
    #[inline]
    pub fn toggle(&mut self, axis: Axis) {
        let value = self.get(axis);
        self.set(axis, !value);
    }

    /// True if any axis is flagged.
    #[inline]
    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }
}

/// One time slot of a motion.
///
/// The engine waits `ticks` timer ticks after the previous event (or after the
/// motion was promoted, for the first event), then pulses every axis in
/// `steps`, then inverts the direction of every axis in `flips`. A flip
/// therefore only affects later slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepEvent {
    /// Timer ticks to wait before this event is due.
    pub ticks: u32,
    /// Axes that step in this slot.
    pub steps: AxisFlags,
    /// Axes whose direction reverses after this slot's steps.
    pub flips: AxisFlags,
}

impl StepEvent {
    /// An event stepping the given axes, with no direction flips.
    #[inline]
    pub const fn new(ticks: u32, steps: AxisFlags) -> Self {
        Self {
            ticks,
            steps,
            flips: AxisFlags::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_set_toggle() {
        let mut flags = AxisFlags::NONE;
        assert!(!flags.any());

        flags.set(Axis::Y, true);
        assert!(flags.get(Axis::Y));
        assert!(flags.any());

        flags.toggle(Axis::Y);
        flags.toggle(Axis::Z);
        assert_eq!(flags, AxisFlags::from_array([false, false, true]));
    }
}
