//! Collaborator interfaces the engine drives.

use crate::motion::{Axis, Direction};

/// Stepper driver: direction and step outputs for the three axes.
///
/// One `pulse_step` call is one physical step of the axis in its current
/// direction.
pub trait StepperDriver {
    /// Error reported by the hardware layer.
    type Error: core::fmt::Debug;

    /// Drive the direction output of an axis.
    fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<(), Self::Error>;

    /// Direction the axis is currently driven in.
    fn direction(&self, axis: Axis) -> Direction;

    /// Emit one step on an axis.
    fn pulse_step(&mut self, axis: Axis) -> Result<(), Self::Error>;
}

/// One-shot step timer.
///
/// Each expiry calls the engine once; the engine re-arms explicitly for the
/// next interval. The timer is never free-running.
pub trait StepTimer {
    /// Fire once after `ticks` timer ticks.
    fn arm(&mut self, ticks: u32);

    /// Cancel any pending expiry and mask the interrupt.
    fn disable(&mut self);
}

impl<D: StepperDriver + ?Sized> StepperDriver for &mut D {
    type Error = D::Error;

    fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<(), Self::Error> {
        (**self).set_direction(axis, direction)
    }

    fn direction(&self, axis: Axis) -> Direction {
        (**self).direction(axis)
    }

    fn pulse_step(&mut self, axis: Axis) -> Result<(), Self::Error> {
        (**self).pulse_step(axis)
    }
}

impl<T: StepTimer + ?Sized> StepTimer for &mut T {
    fn arm(&mut self, ticks: u32) {
        (**self).arm(ticks);
    }

    fn disable(&mut self) {
        (**self).disable();
    }
}
