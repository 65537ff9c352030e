//! Timer tick clock derived from configuration.
//!
//! Converts step rates and nanosecond durations into hardware timer ticks.

use super::system::TimerConfig;
use super::units::{StepRate, Ticks};

/// Tick period of the reference hardware: a 32.768 kHz clock divided by two,
/// 61/2 us per tick.
pub const DEFAULT_TICK_PERIOD_NS: u32 = 30_500;

/// Timer tick clock.
///
/// All conversions round down and never return fewer than one tick, so an
/// armed timer always moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    /// Length of one timer tick in nanoseconds (never zero).
    tick_period_ns: u32,
}

impl Default for TickClock {
    fn default() -> Self {
        Self {
            tick_period_ns: DEFAULT_TICK_PERIOD_NS,
        }
    }
}

impl TickClock {
    /// Create a clock with the given tick period.
    ///
    /// A zero period is replaced by one nanosecond.
    pub fn new(tick_period_ns: u32) -> Self {
        Self {
            tick_period_ns: tick_period_ns.max(1),
        }
    }

    /// Create a clock from the timer configuration.
    pub fn from_config(config: &TimerConfig) -> Self {
        Self::new(config.tick_period_ns)
    }

    /// Length of one tick in nanoseconds.
    #[inline]
    pub fn tick_period_ns(&self) -> u32 {
        self.tick_period_ns
    }

    /// Ticks between steps at a constant rate.
    ///
    /// With the default period this equals `(2_000_000 / rate) / 61`.
    /// Returns `None` for a zero rate.
    pub fn ticks_for_rate(&self, rate: StepRate) -> Option<Ticks> {
        if rate.is_zero() {
            return None;
        }
        let ticks = 1_000_000_000u64 / (u64::from(rate.value()) * u64::from(self.tick_period_ns));
        Some(Ticks(saturate(ticks.max(1))))
    }

    /// Highest step rate that still spans at least one tick.
    pub fn max_rate(&self) -> StepRate {
        StepRate(1_000_000_000 / self.tick_period_ns)
    }

    /// Whole ticks covering a duration, rounded down.
    #[inline]
    pub fn ticks_for_ns(&self, ns: u64) -> u64 {
        ns / u64::from(self.tick_period_ns)
    }

    /// Duration of a number of ticks in nanoseconds.
    #[inline]
    pub fn ns_for_ticks(&self, ticks: u64) -> u64 {
        ticks.saturating_mul(u64::from(self.tick_period_ns))
    }
}

/// Clamp a tick count into the timer's `u32` range.
#[inline]
pub(crate) fn saturate(ticks: u64) -> u32 {
    u32::try_from(ticks).unwrap_or(u32::MAX)
}
