//! Execution engine module for cnc-motion.
//!
//! Provides the collaborator traits, the embedded-hal pin driver, the
//! two-slot motion queue and the timer-tick state machine that executes it.

mod controller;
mod events;
mod executor;
mod hal;
mod pins;
mod position;
mod queue;

pub use controller::SharedEngine;
pub use events::{EventLog, MotionEvent, EVENT_LOG_CAPACITY};
pub use executor::{Engine, Progress, TickOutcome};
pub use hal::{StepTimer, StepperDriver};
pub use pins::{AxisPins, PinStepperDriver, StepMode};
pub use position::MachinePosition;
pub use queue::{MotionQueue, QueueFull};
