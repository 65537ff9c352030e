//! Machine configuration - root configuration structure.

use heapless::String;
use serde::Deserialize;

use crate::motion::Axis;

use super::limits::TravelLimits;
use super::timing::DEFAULT_TICK_PERIOD_NS;
use super::units::StepRate;

/// Root configuration structure from TOML.
///
/// Every section is optional; an empty document yields the reference machine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineConfig {
    /// Step timer settings.
    #[serde(default)]
    pub timer: TimerConfig,

    /// Rates and engine behavior.
    #[serde(default)]
    pub motion: MotionConfig,

    /// Per-axis settings.
    #[serde(default)]
    pub axes: AxesConfig,
}

impl MachineConfig {
    /// Get the configuration of one axis.
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        self.axes.get(axis)
    }

    /// Travel limits of every axis, indexed by [`Axis::index`].
    pub fn travel_limits(&self) -> [Option<TravelLimits>; 3] {
        Axis::ALL.map(|axis| self.axis(axis).limits)
    }
}

/// Step timer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerConfig {
    /// Length of one timer tick in nanoseconds.
    #[serde(default = "default_tick_period_ns")]
    pub tick_period_ns: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_period_ns: default_tick_period_ns(),
        }
    }
}

/// Rates and engine behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct MotionConfig {
    /// Rate used for rapid (uncoordinated) moves, in steps/s.
    #[serde(default = "default_rapid_rate")]
    pub rapid_rate: StepRate,

    /// Per-axis rate above which linear moves log a warning, in steps/s.
    #[serde(default = "default_max_rate")]
    pub max_rate: StepRate,

    /// Feed rate used when a command does not give one, in steps/s.
    #[serde(default = "default_feed_rate")]
    pub default_feed_rate: StepRate,

    /// Whether the engine executes motions as soon as it is created.
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            rapid_rate: default_rapid_rate(),
            max_rate: default_max_rate(),
            default_feed_rate: default_feed_rate(),
            auto_start: default_auto_start(),
        }
    }
}

/// Per-axis configuration for X, Y and Z.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AxesConfig {
    /// X axis.
    #[serde(default)]
    pub x: AxisConfig,
    /// Y axis.
    #[serde(default)]
    pub y: AxisConfig,
    /// Z axis.
    #[serde(default)]
    pub z: AxisConfig,
}

impl AxesConfig {
    /// Get the configuration of one axis.
    pub fn get(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

/// Configuration of a single axis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 16 chars), e.g. "gantry".
    #[serde(default)]
    pub label: String<16>,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Optional travel limits.
    #[serde(default)]
    pub limits: Option<TravelLimits>,
}

fn default_tick_period_ns() -> u32 {
    DEFAULT_TICK_PERIOD_NS
}

fn default_rapid_rate() -> StepRate {
    StepRate(400)
}

fn default_max_rate() -> StepRate {
    StepRate(400)
}

fn default_feed_rate() -> StepRate {
    StepRate(200)
}

fn default_auto_start() -> bool {
    true
}
