//! Axis travel limit configuration and types.

use serde::Deserialize;

/// Policy for handling limit violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Reject moves that would exceed limits.
    #[default]
    Reject,
    /// Clamp target to nearest limit.
    Clamp,
}

/// Travel limits of one axis, in absolute steps from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TravelLimits {
    /// Minimum allowed position in steps.
    pub min_steps: i32,

    /// Maximum allowed position in steps.
    pub max_steps: i32,

    /// What to do when limit is exceeded.
    #[serde(default)]
    pub policy: LimitPolicy,
}

impl TravelLimits {
    /// Create new travel limits.
    pub fn new(min_steps: i32, max_steps: i32, policy: LimitPolicy) -> Self {
        Self {
            min_steps,
            max_steps,
            policy,
        }
    }

    /// Check if limits are valid (min < max).
    pub fn is_valid(&self) -> bool {
        self.min_steps < self.max_steps
    }

    /// Check if a position is within limits.
    pub fn contains(&self, steps: i32) -> bool {
        steps >= self.min_steps && steps <= self.max_steps
    }

    /// Limit nearest to an out-of-range target.
    pub fn nearest(&self, target: i32) -> i32 {
        if target < self.min_steps {
            self.min_steps
        } else {
            self.max_steps
        }
    }

    /// Apply limit policy to a target position.
    ///
    /// Returns `Some(steps)` if valid or clamped, `None` if rejected.
    pub fn apply(&self, target: i32) -> Option<i32> {
        if self.contains(target) {
            Some(target)
        } else {
            match self.policy {
                LimitPolicy::Reject => None,
                LimitPolicy::Clamp => Some(self.nearest(target)),
            }
        }
    }
}
