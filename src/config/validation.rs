//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::motion::Axis;

use super::units::StepRate;
use super::{MachineConfig, TickClock};

/// Validate a machine configuration.
///
/// Checks:
/// - Timer tick period is non-zero
/// - Rapid, maximum and default feed rates are non-zero and resolvable by the timer
/// - Travel limits are valid (min < max)
pub fn validate_config(config: &MachineConfig) -> Result<()> {
    if config.timer.tick_period_ns == 0 {
        return Err(Error::Config(ConfigError::InvalidTickPeriod(0)));
    }

    let clock = TickClock::from_config(&config.timer);
    validate_rate(config.motion.rapid_rate, &clock)?;
    validate_rate(config.motion.max_rate, &clock)?;
    validate_rate(config.motion.default_feed_rate, &clock)?;

    for axis in Axis::ALL {
        validate_axis(axis, config)?;
    }

    Ok(())
}

fn validate_rate(rate: StepRate, clock: &TickClock) -> Result<()> {
    if rate.is_zero() {
        return Err(Error::Config(ConfigError::InvalidRate(0)));
    }

    let max = clock.max_rate();
    if rate > max {
        return Err(Error::Config(ConfigError::RateTooHigh {
            rate: rate.value(),
            max: max.value(),
        }));
    }

    Ok(())
}

fn validate_axis(axis: Axis, config: &MachineConfig) -> Result<()> {
    if let Some(ref limits) = config.axis(axis).limits {
        if !limits.is_valid() {
            return Err(Error::Config(ConfigError::InvalidTravelLimits {
                axis,
                min: limits.min_steps,
                max: limits.max_steps,
            }));
        }
    }

    Ok(())
}
