//! Unit tests for TOML configuration parsing.

use cnc_motion::config::{load_config, parse_config, LimitPolicy, MachineConfig};
use cnc_motion::{Axis, StepRate, TickClock, Ticks};

/// Test parsing a complete machine configuration from TOML.
#[test]
fn test_parse_machine_config() {
    let toml_str = r#"
[timer]
tick_period_ns = 50000

[motion]
rapid_rate = 600
max_rate = 900
default_feed_rate = 150
auto_start = false

[axes.x]
label = "carriage"
invert_direction = true

[axes.y]
label = "gantry"

[axes.y.limits]
min_steps = -2000
max_steps = 2000
"#;

    let config: MachineConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.timer.tick_period_ns, 50_000);
    assert_eq!(config.motion.rapid_rate, StepRate(600));
    assert_eq!(config.motion.max_rate, StepRate(900));
    assert_eq!(config.motion.default_feed_rate, StepRate(150));
    assert!(!config.motion.auto_start);

    let x = config.axis(Axis::X);
    assert_eq!(x.label.as_str(), "carriage");
    assert!(x.invert_direction);
    assert!(x.limits.is_none());

    let limits = config.axis(Axis::Y).limits.expect("Y limits missing");
    assert_eq!(limits.min_steps, -2000);
    assert_eq!(limits.max_steps, 2000);
    assert_eq!(limits.policy, LimitPolicy::Reject);
}

/// Test that omitted sections fall back to the reference machine.
#[test]
fn test_defaults_fill_missing_sections() {
    let config = parse_config("[axes.z]\nlabel = \"spindle\"\n").expect("Failed to parse");

    assert_eq!(config.timer.tick_period_ns, 30_500);
    assert_eq!(config.motion.rapid_rate, StepRate(400));
    assert!(config.motion.auto_start);
    assert_eq!(config.axis(Axis::Z).label.as_str(), "spindle");

    let clock = TickClock::from_config(&config.timer);
    assert_eq!(clock.ticks_for_rate(config.motion.rapid_rate), Some(Ticks(81)));
}

/// Test that an unknown limit policy is a parse error.
#[test]
fn test_unknown_policy_rejected() {
    let toml_str = r#"
[axes.x.limits]
min_steps = 0
max_steps = 10
policy = "bounce"
"#;

    assert!(parse_config(toml_str).is_err());
}

/// Test that a label longer than 16 characters is rejected.
#[test]
fn test_label_too_long() {
    let toml_str = r#"
[axes.x]
label = "this label is far too long"
"#;

    assert!(toml::from_str::<MachineConfig>(toml_str).is_err());
}

/// Test loading a configuration file from disk.
#[test]
fn test_load_config_file() {
    let path = std::env::temp_dir().join(format!("cnc-motion-{}.toml", std::process::id()));
    std::fs::write(&path, "[motion]\nrapid_rate = 1200\n").expect("Failed to write config");

    let config = load_config(&path).expect("Failed to load config");
    assert_eq!(config.motion.rapid_rate, StepRate(1200));

    let _ = std::fs::remove_file(&path);
    assert!(load_config(&path).is_err());
}
