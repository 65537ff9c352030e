//! Coordinated linear interpolation (DDA schedule).
//!
//! Every axis steps at its own constant interval so that all axes arrive
//! together. A logical clock advances in whole timer ticks to the next due
//! step; every axis that is due by then steps in the same slot.

use crate::config::units::StepRate;
use crate::config::{saturate, TickClock};
use crate::error::{MotionError, Result};
use crate::motion::{Axis, AxisFlags, Direction, Motion, StepEvent, StepSequence};

pub(super) fn build(
    id: u16,
    delta: [i32; 3],
    feed: StepRate,
    max_rate: StepRate,
    clock: &TickClock,
) -> Result<Motion> {
    let counts = delta.map(|d| u64::from(d.unsigned_abs()));
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return Err(MotionError::Degenerate.into());
    }
    super::check_len(total)?;

    let distance = libm::sqrt(counts.iter().map(|&n| (n * n) as f64).sum());
    let move_ns = 1e9 * distance / f64::from(feed.value());
    let tick_ns = f64::from(clock.tick_period_ns());

    // Nanoseconds between two steps of each axis
    let interval = counts.map(|n| if n == 0 { 0.0 } else { move_ns / n as f64 });

    for axis in Axis::ALL {
        let steps = counts[axis.index()];
        if super::exceeds_rate(steps, move_ns as u64, max_rate) {
            warn!(
                "linear #{}: {} axis needs more than {} steps/s",
                id,
                axis.name(),
                max_rate.value()
            );
        }
    }

    let mut done = [0u64; 3];
    let due = |axis: Axis, done: &[u64; 3]| {
        let i = axis.index();
        (done[i] + 1) as f64 * interval[i]
    };

    let mut sequence = StepSequence::with_capacity(counts.iter().copied().max().unwrap_or(0) as usize);
    let mut now_ticks = 0u64;

    loop {
        // Soonest due step among the axes that still have steps left
        let next = Axis::ALL
            .into_iter()
            .filter(|axis| done[axis.index()] < counts[axis.index()])
            .map(|axis| (axis, due(axis, &done)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((soonest, due_ns)) = next else {
            break;
        };

        let now_ns = now_ticks as f64 * tick_ns;
        let gap = due_ns - now_ns;
        let skip = if gap > 0.0 {
            libm::floor(gap / tick_ns) as u64 + 1
        } else {
            1
        };
        now_ticks += skip;
        let now_ns = now_ticks as f64 * tick_ns;

        let mut steps = AxisFlags::NONE;
        for axis in Axis::ALL {
            let a = axis.index();
            if done[a] < counts[a] && (axis == soonest || due(axis, &done) <= now_ns) {
                steps.set(axis, true);
                done[a] += 1;
            }
        }

        sequence.push(StepEvent::new(saturate(skip), steps));
    }

    trace!("linear #{}: {} ns planned, {} ticks scheduled", id, move_ns as u64, now_ticks);

    Ok(Motion::new(id, delta.map(Direction::from_delta), sequence)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> TickClock {
        TickClock::default()
    }

    #[test]
    fn test_single_axis_even_spacing() {
        // 200 steps/s: one step every 5 ms, 163.9 ticks
        let motion = build(1, [10, 0, 0], StepRate(200), StepRate(400), &clock()).unwrap();

        assert_eq!(motion.len(), 10);
        assert_eq!(motion.step_counts(), [10, 0, 0]);
        for event in motion.sequence() {
            assert!(event.ticks == 163 || event.ticks == 164, "ticks {}", event.ticks);
        }
    }

    #[test]
    fn test_diagonal_steps_together() {
        let motion = build(2, [5, -5, 0], StepRate(200), StepRate(400), &clock()).unwrap();

        assert_eq!(motion.len(), 5);
        assert!(motion.sequence().iter().all(|e| e.steps.x && e.steps.y && !e.steps.z));
        assert_eq!(motion.displacement(), [5, -5, 0]);
    }

    #[test]
    fn test_total_ticks_match_move_time() {
        let motion = build(3, [300, 400, 0], StepRate(250), StepRate(400), &clock()).unwrap();

        // 500 steps at 250 steps/s = 2 s
        let expected = 2_000_000_000.0 / 30_500.0;
        let total = motion.duration_ticks() as f64;
        assert!(total >= expected && total <= expected + 1.0, "total {}", total);
    }

    #[test]
    fn test_every_slot_steps_the_soonest_axis() {
        let motion = build(5, [6, -2, 3], StepRate(150), StepRate(400), &clock()).unwrap();

        assert!(motion.sequence().iter().all(|e| e.steps.any()));
        assert_eq!(motion.step_counts(), [6, 2, 3]);
        // X has the shortest interval
        assert_eq!(motion.sequence()[0].steps, AxisFlags::from_array([true, false, false]));
    }

    #[test]
    fn test_fast_axis_still_conserves_steps() {
        // Far above what the timer can resolve
        let motion = build(4, [2000, 3, -1], StepRate(100_000), StepRate(400), &clock()).unwrap();

        assert_eq!(motion.step_counts(), [2000, 3, 1]);
        assert!(motion.sequence().iter().all(|e| e.ticks >= 1));
    }
}
