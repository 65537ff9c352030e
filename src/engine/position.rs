//! Machine position tracking.
//!
//! Absolute step count per axis since the last origin reset.

use crate::motion::{Axis, Direction};

/// Absolute machine position in steps.
///
/// Written only by the engine, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachinePosition {
    steps: [i32; 3],
}

impl MachinePosition {
    /// Position at the origin.
    #[inline]
    pub const fn new() -> Self {
        Self { steps: [0; 3] }
    }

    /// Position at given step counts.
    #[inline]
    pub const fn at(steps: [i32; 3]) -> Self {
        Self { steps }
    }

    /// Get the position of one axis.
    #[inline]
    pub fn get(&self, axis: Axis) -> i32 {
        self.steps[axis.index()]
    }

    /// Get all axes, indexed by [`Axis::index`].
    #[inline]
    pub fn as_array(&self) -> [i32; 3] {
        self.steps
    }

    /// Account for one step of `axis` in `direction`.
    #[inline]
    pub fn step(&mut self, axis: Axis, direction: Direction) {
        let pos = &mut self.steps[axis.index()];
        *pos = pos.wrapping_add(direction.sign());
    }

    /// Set current position as the new origin.
    #[inline]
    pub fn set_origin(&mut self) {
        self.steps = [0; 3];
    }
}
