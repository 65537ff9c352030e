//! Stepper driver over embedded-hal 1.0 GPIO pins.
//!
//! One STEP and one DIR output per axis. Direction writes are cached so an
//! unchanged direction never touches the pin.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::AxisConfig;
use crate::error::DriverError;
use crate::motion::{Axis, Direction};

use super::hal::StepperDriver;

/// How a step is signalled on the STEP line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Every edge is a step; the line toggles once per step
    /// (drivers with double-edge stepping, e.g. TMC26x `DEDGE`).
    DoubleEdge,
    /// High, hold for `width_ns`, low.
    Pulse {
        /// Pulse width in nanoseconds.
        width_ns: u32,
    },
}

impl Default for StepMode {
    fn default() -> Self {
        StepMode::Pulse { width_ns: 2_000 }
    }
}

/// STEP/DIR pins of one axis.
#[derive(Debug)]
pub struct AxisPins<STEP, DIR> {
    /// STEP output.
    pub step: STEP,
    /// DIR output (high = forward unless inverted).
    pub dir: DIR,
    /// Invert direction pin logic.
    pub invert_direction: bool,
}

impl<STEP, DIR> AxisPins<STEP, DIR> {
    /// Pins with normal direction logic.
    pub fn new(step: STEP, dir: DIR) -> Self {
        Self {
            step,
            dir,
            invert_direction: false,
        }
    }

    /// Pins with direction logic taken from the axis configuration.
    pub fn from_config(step: STEP, dir: DIR, config: &AxisConfig) -> Self {
        Self {
            step,
            dir,
            invert_direction: config.invert_direction,
        }
    }
}

/// Runtime state of one axis.
#[derive(Debug)]
struct AxisOutput<STEP, DIR> {
    pins: AxisPins<STEP, DIR>,
    /// Last direction written (cached to avoid unnecessary pin writes).
    direction: Option<Direction>,
    /// STEP line level, tracked for double-edge stepping.
    step_high: bool,
}

/// [`StepperDriver`] driving STEP/DIR pins directly.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider for the pulse width (must implement `DelayNs`)
///
/// All axes share pin types; use erased pins from the HAL when they differ.
#[derive(Debug)]
pub struct PinStepperDriver<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    axes: [AxisOutput<STEP, DIR>; 3],
    delay: DELAY,
    mode: StepMode,
}

impl<STEP, DIR, DELAY> PinStepperDriver<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a driver from the X, Y and Z pins.
    ///
    /// STEP lines are assumed low. The direction is unknown until first set.
    pub fn new(pins: [AxisPins<STEP, DIR>; 3], delay: DELAY, mode: StepMode) -> Self {
        Self {
            axes: pins.map(|pins| AxisOutput {
                pins,
                direction: None,
                step_high: false,
            }),
            delay,
            mode,
        }
    }

    /// Get the step mode.
    #[inline]
    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Release the pins and the delay provider.
    pub fn release(self) -> ([AxisPins<STEP, DIR>; 3], DELAY) {
        (self.axes.map(|axis| axis.pins), self.delay)
    }
}

impl<STEP, DIR, DELAY> StepperDriver for PinStepperDriver<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    type Error = DriverError;

    fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<(), DriverError> {
        let output = &mut self.axes[axis.index()];
        if output.direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Forward => !output.pins.invert_direction,
            Direction::Reverse => output.pins.invert_direction,
        };

        let written = if pin_high {
            output.pins.dir.set_high()
        } else {
            output.pins.dir.set_low()
        };
        written.map_err(|_| DriverError::DirPin(axis))?;

        output.direction = Some(direction);
        Ok(())
    }

    fn direction(&self, axis: Axis) -> Direction {
        self.axes[axis.index()].direction.unwrap_or_default()
    }

    fn pulse_step(&mut self, axis: Axis) -> Result<(), DriverError> {
        let output = &mut self.axes[axis.index()];
        let err = |_| DriverError::StepPin(axis);

        match self.mode {
            StepMode::DoubleEdge => {
                if output.step_high {
                    output.pins.step.set_low().map_err(err)?;
                } else {
                    output.pins.step.set_high().map_err(err)?;
                }
                output.step_high = !output.step_high;
            }
            StepMode::Pulse { width_ns } => {
                output.pins.step.set_high().map_err(err)?;
                self.delay.delay_ns(width_ns);
                output.pins.step.set_low().map_err(err)?;
            }
        }

        Ok(())
    }
}
