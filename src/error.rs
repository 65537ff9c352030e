//! Error types for cnc-motion.
//!
//! Provides unified error handling across configuration, motion building and
//! the stepper-driver hardware layer. Queue backpressure is not an error and
//! lives in [`crate::engine::QueueFull`].

use core::fmt;

use crate::motion::Axis;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all cnc-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motion building or engine state error
    Motion(MotionError),
    /// Stepper driver / GPIO error
    Driver(DriverError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Timer tick period must be > 0
    InvalidTickPeriod(u32),
    /// Step rate must be > 0
    InvalidRate(u32),
    /// Step rate is so high that one step would take less than one timer tick
    RateTooHigh {
        /// Requested rate in steps/s
        rate: u32,
        /// Highest rate the timer can resolve
        max: u32,
    },
    /// Invalid travel limits (min must be < max)
    InvalidTravelLimits {
        /// Axis the limits belong to
        axis: Axis,
        /// Minimum limit value
        min: i32,
        /// Maximum limit value
        max: i32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motion building and engine state errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Zero net displacement, or an arc too small to produce any step
    Degenerate,
    /// Feed or rapid rate of zero steps/s
    InvalidRate,
    /// Target position is outside the axis travel limits
    LimitExceeded {
        /// Axis that would leave its travel range
        axis: Axis,
        /// Requested absolute position in steps
        target: i32,
        /// Limit that was exceeded (min or max)
        limit: i32,
    },
    /// Operation requires an idle engine
    Busy,
    /// Step sequence would not fit in memory
    SequenceTooLong {
        /// Number of step events requested
        events: u64,
    },
    /// Arc radius beyond what the interpolator can walk
    RadiusTooLarge {
        /// Radius in steps
        radius: u64,
    },
}

/// Stepper driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// STEP pin write failed
    StepPin(Axis),
    /// DIR pin write failed
    DirPin(Axis),
}

impl DriverError {
    /// Axis whose pin failed.
    pub fn axis(self) -> Axis {
        match self {
            DriverError::StepPin(axis) | DriverError::DirPin(axis) => axis,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Driver(e) => write!(f, "Driver error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidTickPeriod(v) => {
                write!(f, "Invalid tick period: {} ns. Must be > 0", v)
            }
            ConfigError::InvalidRate(v) => write!(f, "Invalid step rate: {}. Must be > 0", v),
            ConfigError::RateTooHigh { rate, max } => {
                write!(f, "Step rate {} exceeds timer resolution (max {} steps/s)", rate, max)
            }
            ConfigError::InvalidTravelLimits { axis, min, max } => {
                write!(f, "Invalid {} travel limits: min ({}) must be < max ({})", axis, min, max)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::Degenerate => write!(f, "Motion has no steps"),
            MotionError::InvalidRate => write!(f, "Step rate must be > 0"),
            MotionError::LimitExceeded { axis, target, limit } => {
                write!(f, "{} target {} exceeds limit {}", axis, target, limit)
            }
            MotionError::Busy => write!(f, "Motion engine is busy"),
            MotionError::SequenceTooLong { events } => {
                write!(f, "Step sequence of {} events is too long", events)
            }
            MotionError::RadiusTooLarge { radius } => {
                write!(f, "Arc radius of {} steps is too large", radius)
            }
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::StepPin(axis) => write!(f, "{} STEP pin operation failed", axis),
            DriverError::DirPin(axis) => write!(f, "{} DIR pin operation failed", axis),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Error::Driver(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for DriverError {}
