//! Unit tests for configuration validation.

use cnc_motion::config::{validate_config, LimitPolicy, MachineConfig, TravelLimits};
use cnc_motion::error::{ConfigError, Error};
use cnc_motion::{Axis, StepRate};

/// Test that the default configuration passes validation.
#[test]
fn test_default_config_valid() {
    assert!(validate_config(&MachineConfig::default()).is_ok());
}

/// Test that a zero tick period is rejected.
#[test]
fn test_zero_tick_period() {
    let mut config = MachineConfig::default();
    config.timer.tick_period_ns = 0;

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidTickPeriod(0)))
    ));
}

/// Test that a zero feed rate is rejected.
#[test]
fn test_zero_default_feed() {
    let mut config = MachineConfig::default();
    config.motion.default_feed_rate = StepRate(0);

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidRate(0)))
    ));
}

/// Test that a rate needing less than one tick per step is rejected.
#[test]
fn test_rate_limit_follows_tick_period() {
    let mut config = MachineConfig::default();
    config.motion.rapid_rate = StepRate(20_000);
    assert!(validate_config(&config).is_ok());

    // 100 us ticks resolve at most 10 000 steps/s
    config.timer.tick_period_ns = 100_000;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::RateTooHigh {
            rate: 20_000,
            max: 10_000
        }))
    ));
}

/// Test that equal travel limits are rejected.
#[test]
fn test_empty_travel_range() {
    let mut config = MachineConfig::default();
    config.axes.y.limits = Some(TravelLimits::new(50, 50, LimitPolicy::Reject));

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidTravelLimits {
            axis: Axis::Y,
            min: 50,
            max: 50
        }))
    ));
}
