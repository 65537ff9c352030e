//! Unit types for step rates and timer ticks.
//!
//! Keeps steps-per-second and hardware timer ticks apart at compile time.

use serde::Deserialize;

/// Step rate in steps per second.
///
/// Used for rapid rates, feed rates and the maximum-rate warning threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct StepRate(pub u32);

impl StepRate {
    /// Create a new StepRate value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// True for a rate of zero steps/s.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Duration of one step at this rate, in nanoseconds.
    ///
    /// Returns `None` for a zero rate.
    #[inline]
    pub fn step_period_ns(self) -> Option<u64> {
        if self.0 == 0 {
            None
        } else {
            Some(1_000_000_000 / u64::from(self.0))
        }
    }
}

/// Duration in hardware timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Ticks(pub u32);

impl Ticks {
    /// Create a new Ticks value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}
