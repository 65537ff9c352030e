//! Circular arc interpolation (midpoint circle, octant by octant).
//!
//! The walk runs counter-clockwise around the center. Inside each octant the
//! major axis steps in every slot and the minor axis steps when that keeps
//! the point closer to the circle. Clockwise arcs are walked in a frame
//! mirrored about the X axis, so only the initial Y direction changes.

use crate::config::units::Ticks;
use crate::error::{MotionError, Result};
use crate::motion::{Axis, AxisFlags, Direction, Motion, StepEvent, StepSequence};

use super::octant::{self, coord, octant_of, CCW};
use super::{ArcMove, Rotation, MAX_ARC_RADIUS, MAX_SEQUENCE_LEN};

pub(super) fn build(id: u16, arc_move: &ArcMove, ticks: Ticks) -> Result<Motion> {
    let radius = radius_of(arc_move.center)?;
    let [x_off, y_off] = arc_move.center.map(i64::from);
    let [dx, dy] = arc_move.end.map(i64::from);

    let mirrored = arc_move.rotation == Rotation::Clockwise;
    let flip_y = if mirrored { -1 } else { 1 };

    // Arc start and end relative to the center
    let start = [-x_off, -y_off * flip_y];
    let end = [dx - x_off, (dy - y_off) * flip_y];

    let passes = octant::span(start, end);
    let first = octant_of(start[0], start[1]);
    let limit = (8 * (radius as u64 + 1)).min(MAX_SEQUENCE_LEN + 1);

    let mut walk = Walk::new(start, radius, ticks, limit as usize);
    for pass in 0..passes {
        let last = pass + 1 == passes;
        walk.octant((first + pass) % 8, if last { Some(end) } else { None });
    }

    trace!(
        "arc #{}: r={}, {} octant passes, {} events",
        id,
        radius,
        passes,
        walk.sequence.len()
    );
    super::check_len(walk.sequence.len() as u64)?;

    let (dirs, sequence) = walk.finish(mirrored);
    Ok(Motion::new(id, dirs, sequence)?)
}

/// Rounded distance to the center.
///
/// Squares are taken in `u64`, which holds the sum for any `i32` offsets.
fn radius_of(center: [i32; 2]) -> Result<i64> {
    let [x, y] = center.map(|c| u64::from(c.unsigned_abs()));
    let radius = libm::round(libm::sqrt((x * x + y * y) as f64)) as u64;

    if radius == 0 {
        return Err(MotionError::Degenerate.into());
    }
    if radius > MAX_ARC_RADIUS {
        return Err(MotionError::RadiusTooLarge { radius }.into());
    }
    Ok(radius as i64)
}

/// Midpoint walk state.
struct Walk {
    /// Current point relative to the center.
    point: [i64; 2],
    radius_sq: i64,
    ticks: u32,
    limit: usize,
    /// Direction each axis had before its first step.
    dirs: [Direction; 3],
    /// Direction each in-plane axis is currently driven in, once it stepped.
    active: [Option<Direction>; 2],
    sequence: StepSequence,
}

impl Walk {
    fn new(start: [i64; 2], radius: i64, ticks: Ticks, limit: usize) -> Self {
        Self {
            point: start,
            radius_sq: radius * radius,
            ticks: ticks.value(),
            limit,
            dirs: [Direction::from_delta(0); 3],
            active: [None; 2],
            sequence: StepSequence::new(),
        }
    }

    /// Walk through octant `k`; on the last pass stop once the major
    /// coordinate reaches or passes the end point's.
    fn octant(&mut self, k: usize, end: Option<[i64; 2]>) {
        let roles = CCW[k];

        while self.sequence.len() < self.limit {
            if octant_of(self.point[0], self.point[1]) != k {
                break;
            }
            if let Some(end) = end {
                // A diagonal slot at the octant boundary can already be past it
                let ahead = coord(end, roles.major) - coord(self.point, roles.major);
                if ahead * i64::from(roles.major_dir.sign()) <= 0 {
                    break;
                }
            }

            let major = offset(self.point, roles.major, roles.major_dir);
            let diagonal = offset(major, roles.minor, roles.minor_dir);
            let step_minor = self.error(diagonal).abs() < self.error(major).abs();

            let mut steps = AxisFlags::NONE;
            self.orient(roles.major, roles.major_dir);
            steps.set(roles.major, true);

            if step_minor {
                self.orient(roles.minor, roles.minor_dir);
                steps.set(roles.minor, true);
                self.point = diagonal;
            } else {
                self.point = major;
            }

            self.sequence.push(StepEvent::new(self.ticks, steps));
        }
    }

    /// Radial error of a point: `x² + y² - r²`.
    #[inline]
    fn error(&self, p: [i64; 2]) -> i64 {
        p[0] * p[0] + p[1] * p[1] - self.radius_sq
    }

    /// Make `axis` travel in `dir` for the slot about to be pushed.
    ///
    /// The first step of an axis sets its initial direction; a later change
    /// flips the axis after the previous slot.
    fn orient(&mut self, axis: Axis, dir: Direction) {
        let i = axis.index();
        match self.active[i] {
            None => self.dirs[i] = dir,
            Some(current) if current != dir => {
                if let Some(last) = self.sequence.last_mut() {
                    last.flips.set(axis, true);
                }
            }
            Some(_) => {}
        }
        self.active[i] = Some(dir);
    }

    fn finish(mut self, mirrored: bool) -> ([Direction; 3], StepSequence) {
        let y = Axis::Y.index();
        if mirrored && self.active[y].is_some() {
            self.dirs[y] = self.dirs[y].reversed();
        }
        (self.dirs, self.sequence)
    }
}

/// Move `point` one step along an in-plane axis.
#[inline]
fn offset(mut point: [i64; 2], axis: Axis, dir: Direction) -> [i64; 2] {
    let i = if axis == Axis::X { 0 } else { 1 };
    point[i] += i64::from(dir.sign());
    point
}
