//! Configuration module for cnc-motion.
//!
//! Provides types for loading and validating machine configuration from TOML
//! files (with `std` feature) or pre-parsed data, and the timer tick clock
//! derived from it.

mod limits;
#[cfg(feature = "std")]
mod loader;
mod system;
mod timing;
pub mod units;
mod validation;

pub use limits::{LimitPolicy, TravelLimits};
pub use system::{AxesConfig, AxisConfig, MachineConfig, MotionConfig, TimerConfig};
pub use timing::{TickClock, DEFAULT_TICK_PERIOD_NS};
pub use validation::validate_config;

pub(crate) use timing::saturate;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{StepRate, Ticks};
