//! # cnc-motion
//!
//! Motion core of a three-axis stepper CNC controller: step interpolation and
//! interrupt-driven motion execution.
//!
//! ## Features
//!
//! - **Interpolation**: rapid, linear (DDA) and circular-arc (midpoint) builders
//!   turn a displacement into a fully materialized [`StepSequence`]
//! - **Two-slot queue**: one executing and one pending [`Motion`], with
//!   backpressure instead of blocking
//! - **Timer-driven engine**: one step event per timer interrupt, one-shot
//!   re-arm, absolute position tracking
//! - **embedded-hal 1.0**: STEP/DIR pins through `OutputPin`, pulse width through `DelayNs`
//! - **no_std compatible**: needs only `alloc`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cnc_motion::{Engine, MachineConfig, MotionPlanner, SharedEngine, StepRate};
//!
//! let config: MachineConfig = cnc_motion::load_config("machine.toml")?;
//! let mut planner = MotionPlanner::from_config(&config);
//! static ENGINE: SharedEngine<Driver, Timer> = SharedEngine::empty();
//!
//! ENGINE.init(Engine::from_config(driver, timer, &config));
//!
//! // Foreground: build and queue a move
//! let motion = planner.linear_to([1200, -300, 0], StepRate(250))?;
//! if let Err(full) = ENGINE.enqueue(motion) {
//!     // retry later with full.into_inner()
//! }
//!
//! // Timer interrupt handler
//! ENGINE.on_timer_interrupt();
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and the host critical-section implementation
//! - `tracing`: Routes motion logs through `tracing`
//! - `defmt`: Routes motion logs through `defmt` for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod logging;

// Core modules
pub mod config;
pub mod engine;
pub mod error;
pub mod interpolate;
pub mod motion;
pub mod planner;

// Re-exports for ergonomic API
pub use config::{validate_config, MachineConfig, TickClock};
pub use engine::{
    Engine, MachinePosition, MotionEvent, MotionQueue, PinStepperDriver, QueueFull, SharedEngine,
    StepTimer, StepperDriver, TickOutcome,
};
pub use error::{Error, Result};
pub use interpolate::{ArcMove, Interpolator, Rotation};
pub use motion::{Axis, AxisFlags, Direction, Motion, StepEvent, StepSequence};
pub use planner::MotionPlanner;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{StepRate, Ticks};
