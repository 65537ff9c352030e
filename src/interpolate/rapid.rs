//! Rapid (uniform-rate) interpolation.

use crate::config::units::Ticks;
use crate::error::{MotionError, Result};
use crate::motion::{AxisFlags, Direction, Motion, StepEvent, StepSequence};

/// One slot per step of the longest axis; axis `a` steps in slot `i` iff
/// `i < |delta_a|`.
pub(super) fn build(id: u16, delta: [i32; 3], ticks: Ticks) -> Result<Motion> {
    let counts = delta.map(i32::unsigned_abs);
    let len = counts.iter().copied().max().unwrap_or(0);
    if len == 0 {
        return Err(MotionError::Degenerate.into());
    }
    super::check_len(u64::from(len))?;

    let mut sequence = StepSequence::with_capacity(len as usize);
    for i in 0..len {
        let steps = AxisFlags::from_array(counts.map(|n| i < n));
        sequence.push(StepEvent::new(ticks.value(), steps));
    }

    Ok(Motion::new(id, delta.map(Direction::from_delta), sequence)?)
}
