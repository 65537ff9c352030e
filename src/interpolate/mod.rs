//! Interpolation module for cnc-motion.
//!
//! Turns a displacement into a fully materialized [`Motion`]:
//! - [`Interpolator::rapid`]: uncoordinated, every axis at the rapid rate
//! - [`Interpolator::linear`]: coordinated straight line (DDA schedule)
//! - [`Interpolator::arc`]: circular arc in the XY plane (midpoint circle)
//!
//! Builders run in foreground code and share no state with the engine.

mod arc;
mod linear;
mod octant;
mod rapid;

use crate::config::units::{StepRate, Ticks};
use crate::config::{MachineConfig, TickClock};
use crate::error::{MotionError, Result};
use crate::motion::Motion;

/// Upper bound on the number of events in one step sequence.
pub const MAX_SEQUENCE_LEN: u64 = 1 << 20;

/// Largest arc radius in steps; keeps every squared distance within `i64`.
pub const MAX_ARC_RADIUS: u64 = 1 << 30;

/// Rotation direction of an arc, seen from +Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// G2.
    Clockwise,
    /// G3.
    CounterClockwise,
}

/// Parameters of an XY arc move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcMove {
    /// Displacement from the arc start to the arc end, in steps.
    pub end: [i32; 2],
    /// Offset of the circle center from the arc start, in steps.
    pub center: [i32; 2],
    /// Direction of travel around the center.
    pub rotation: Rotation,
    /// Feed rate along the path.
    pub feed: StepRate,
}

/// Motion builder bound to a timer clock and the machine rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpolator {
    clock: TickClock,
    rapid_rate: StepRate,
    max_rate: StepRate,
}

impl Interpolator {
    /// Create an interpolator.
    pub fn new(clock: TickClock, rapid_rate: StepRate, max_rate: StepRate) -> Self {
        Self {
            clock,
            rapid_rate,
            max_rate,
        }
    }

    /// Create an interpolator from the machine configuration.
    pub fn from_config(config: &MachineConfig) -> Self {
        Self::new(
            TickClock::from_config(&config.timer),
            config.motion.rapid_rate,
            config.motion.max_rate,
        )
    }

    /// Get the timer clock.
    #[inline]
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Get the rapid rate.
    #[inline]
    pub fn rapid_rate(&self) -> StepRate {
        self.rapid_rate
    }

    /// Change the rapid rate used by later rapid moves.
    #[inline]
    pub fn set_rapid_rate(&mut self, rate: StepRate) {
        self.rapid_rate = rate;
    }

    /// Get the per-axis rate above which linear moves warn.
    #[inline]
    pub fn max_rate(&self) -> StepRate {
        self.max_rate
    }

    /// Build a rapid move.
    ///
    /// Every axis steps at the rapid rate from the first slot; shorter axes
    /// finish early.
    ///
    /// # Errors
    ///
    /// [`MotionError::Degenerate`] for a zero displacement,
    /// [`MotionError::InvalidRate`] if the rapid rate is zero.
    pub fn rapid(&self, id: u16, delta: [i32; 3]) -> Result<Motion> {
        let ticks = self.ticks_for(self.rapid_rate)?;
        let motion = rapid::build(id, delta, ticks)?;
        debug!("rapid #{}: {} events, {} ticks", id, motion.len(), motion.duration_ticks());
        Ok(motion)
    }

    /// Build a coordinated straight-line move at `feed` steps/s along the path.
    ///
    /// Logs a warning (and proceeds) if an axis would exceed the maximum rate.
    ///
    /// # Errors
    ///
    /// [`MotionError::Degenerate`] for a zero displacement,
    /// [`MotionError::InvalidRate`] for a zero feed rate.
    pub fn linear(&self, id: u16, delta: [i32; 3], feed: StepRate) -> Result<Motion> {
        if feed.is_zero() {
            return Err(MotionError::InvalidRate.into());
        }
        let motion = linear::build(id, delta, feed, self.max_rate, &self.clock)?;
        debug!("linear #{}: {} events, {} ticks", id, motion.len(), motion.duration_ticks());
        Ok(motion)
    }

    /// Build a circular arc in the XY plane.
    ///
    /// # Errors
    ///
    /// [`MotionError::Degenerate`] if the radius rounds to zero or the arc
    /// yields no step, [`MotionError::InvalidRate`] for a zero feed rate.
    pub fn arc(&self, id: u16, arc_move: &ArcMove) -> Result<Motion> {
        let ticks = self.ticks_for(arc_move.feed)?;
        let motion = arc::build(id, arc_move, ticks)?;
        debug!("arc #{}: {} events, {} ticks", id, motion.len(), motion.duration_ticks());
        Ok(motion)
    }

    fn ticks_for(&self, rate: StepRate) -> Result<Ticks> {
        self.clock
            .ticks_for_rate(rate)
            .ok_or_else(|| MotionError::InvalidRate.into())
    }
}

/// True if stepping `steps` times within `duration_ns` needs more than
/// `max_rate` steps/s, allowing one step of slack.
pub fn exceeds_rate(steps: u64, duration_ns: u64, max_rate: StepRate) -> bool {
    let allowed = u128::from(duration_ns) * u128::from(max_rate.value()) / 1_000_000_000;
    u128::from(steps) > allowed + 1
}

fn check_len(events: u64) -> Result<()> {
    if events > MAX_SEQUENCE_LEN {
        return Err(MotionError::SequenceTooLong { events }.into());
    }
    Ok(())
}
