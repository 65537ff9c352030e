//! Direct-command front end.
//!
//! [`MotionPlanner`] turns absolute targets into motions. It tracks the
//! *planned* position, the end point of everything built so far, so that
//! consecutive commands chain correctly while earlier motions still execute.

use crate::config::units::StepRate;
use crate::config::{MachineConfig, TravelLimits};
use crate::error::{MotionError, Result};
use crate::interpolate::{ArcMove, Interpolator, Rotation};
use crate::motion::{Axis, Motion};

/// Builds motions from absolute targets and allocates their ids.
#[derive(Debug, Clone)]
pub struct MotionPlanner {
    interpolator: Interpolator,
    limits: [Option<TravelLimits>; 3],
    default_feed: StepRate,
    planned: [i32; 3],
    next_id: u16,
}

impl MotionPlanner {
    /// Create a planner at the origin.
    pub fn new(interpolator: Interpolator, default_feed: StepRate) -> Self {
        Self {
            interpolator,
            limits: [None; 3],
            default_feed,
            planned: [0; 3],
            next_id: 1,
        }
    }

    /// Create a planner from the machine configuration.
    pub fn from_config(config: &MachineConfig) -> Self {
        let mut planner = Self::new(
            Interpolator::from_config(config),
            config.motion.default_feed_rate,
        );
        planner.limits = config.travel_limits();
        planner
    }

    /// Get the interpolator.
    #[inline]
    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    /// End point of everything planned so far.
    #[inline]
    pub fn planned_position(&self) -> [i32; 3] {
        self.planned
    }

    /// Feed rate used by [`linear_to_default`](Self::linear_to_default).
    #[inline]
    pub fn default_feed(&self) -> StepRate {
        self.default_feed
    }

    /// Id the next motion will get.
    #[inline]
    pub fn next_id(&self) -> u16 {
        self.next_id
    }

    /// Set travel limits of one axis.
    pub fn set_limits(&mut self, axis: Axis, limits: Option<TravelLimits>) {
        self.limits[axis.index()] = limits;
    }

    /// Change the rapid rate.
    ///
    /// # Errors
    ///
    /// [`MotionError::InvalidRate`] for a zero rate.
    pub fn set_rapid_rate(&mut self, rate: StepRate) -> Result<()> {
        if rate.is_zero() {
            return Err(MotionError::InvalidRate.into());
        }
        debug!("rapid rate set to {} steps/s", rate.value());
        self.interpolator.set_rapid_rate(rate);
        Ok(())
    }

    /// Resynchronise with the machine, e.g. after an emergency stop
    /// discarded planned motions.
    pub fn sync_position(&mut self, position: [i32; 3]) {
        self.planned = position;
    }

    /// Rapid move to an absolute target.
    ///
    /// # Errors
    ///
    /// [`MotionError::LimitExceeded`] if a rejecting limit is crossed,
    /// [`MotionError::Degenerate`] if the target is the planned position.
    pub fn rapid_to(&mut self, target: [i32; 3]) -> Result<Motion> {
        let target = self.apply_limits(target)?;
        let delta = self.delta_to(target);
        self.commit(|interp, id| interp.rapid(id, delta))
    }

    /// Rapid move by a relative displacement.
    ///
    /// # Errors
    ///
    /// As [`rapid_to`](Self::rapid_to).
    pub fn rapid_by(&mut self, delta: [i32; 3]) -> Result<Motion> {
        let target = self.target_by(delta);
        self.rapid_to(target)
    }

    /// Rapid move back to the origin.
    ///
    /// # Errors
    ///
    /// As [`rapid_to`](Self::rapid_to).
    pub fn home(&mut self) -> Result<Motion> {
        self.rapid_to([0; 3])
    }

    /// Coordinated straight move to an absolute target.
    ///
    /// # Errors
    ///
    /// As [`rapid_to`](Self::rapid_to), plus [`MotionError::InvalidRate`] for
    /// a zero feed rate.
    pub fn linear_to(&mut self, target: [i32; 3], feed: StepRate) -> Result<Motion> {
        let target = self.apply_limits(target)?;
        let delta = self.delta_to(target);
        self.commit(|interp, id| interp.linear(id, delta, feed))
    }

    /// Coordinated straight move at the default feed rate.
    ///
    /// # Errors
    ///
    /// As [`linear_to`](Self::linear_to).
    pub fn linear_to_default(&mut self, target: [i32; 3]) -> Result<Motion> {
        self.linear_to(target, self.default_feed)
    }

    /// Arc in the XY plane to an absolute XY end point.
    ///
    /// `center` is the offset of the circle center from the planned position.
    /// The end point is checked against the limits; it is never clamped.
    ///
    /// # Errors
    ///
    /// [`MotionError::LimitExceeded`] if the end point lies outside the
    /// limits, plus the errors of [`Interpolator::arc`].
    pub fn arc_to(
        &mut self,
        end: [i32; 2],
        center: [i32; 2],
        rotation: Rotation,
        feed: StepRate,
    ) -> Result<Motion> {
        for (axis, &value) in [Axis::X, Axis::Y].iter().zip(end.iter()) {
            if let Some(limits) = self.limits[axis.index()] {
                if !limits.contains(value) {
                    return Err(MotionError::LimitExceeded {
                        axis: *axis,
                        target: value,
                        limit: limits.nearest(value),
                    }
                    .into());
                }
            }
        }

        let arc_move = ArcMove {
            end: [
                end[0].wrapping_sub(self.planned[0]),
                end[1].wrapping_sub(self.planned[1]),
            ],
            center,
            rotation,
            feed,
        };
        self.commit(|interp, id| interp.arc(id, &arc_move))
    }

    fn apply_limits(&self, target: [i32; 3]) -> Result<[i32; 3]> {
        let mut limited = target;
        for axis in Axis::ALL {
            let i = axis.index();
            if let Some(limits) = self.limits[i] {
                limited[i] = limits.apply(target[i]).ok_or(MotionError::LimitExceeded {
                    axis,
                    target: target[i],
                    limit: limits.nearest(target[i]),
                })?;
                if limited[i] != target[i] {
                    debug!("{} target {} clamped to {}", axis.name(), target[i], limited[i]);
                }
            }
        }
        Ok(limited)
    }

    fn delta_to(&self, target: [i32; 3]) -> [i32; 3] {
        [0, 1, 2].map(|i| target[i].wrapping_sub(self.planned[i]))
    }

    fn target_by(&self, delta: [i32; 3]) -> [i32; 3] {
        [0, 1, 2].map(|i| self.planned[i].saturating_add(delta[i]))
    }

    /// Build with the next id; on success advance the id and the planned
    /// position by what the motion actually moves.
    fn commit(&mut self, build: impl FnOnce(&Interpolator, u16) -> Result<Motion>) -> Result<Motion> {
        let motion = build(&self.interpolator, self.next_id)?;
        let moved = motion.displacement();
        for i in 0..3 {
            self.planned[i] = self.planned[i].wrapping_add(moved[i]);
        }
        self.next_id = self.next_id.wrapping_add(1);
        Ok(motion)
    }
}
