//! Motion module for cnc-motion.
//!
//! Provides the step-event data model shared by the interpolators and the engine.

mod direction;
mod sequence;
mod step;

pub use direction::{Axis, Direction};
pub use sequence::{Motion, StepSequence};
pub use step::{AxisFlags, StepEvent};
