//! Octant table for counter-clockwise circle traversal.
//!
//! Octants are numbered counter-clockwise from +X; octant `k` covers angles
//! `[45k, 45(k+1))` degrees around the center.

use crate::motion::Axis::{self, X, Y};
use crate::motion::Direction::{self, Forward as Pos, Reverse as Neg};

/// Axis roles inside one octant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Octant {
    /// Axis that steps in every slot.
    pub major: Axis,
    /// Travel direction of the major axis.
    pub major_dir: Direction,
    /// Axis that steps only when it keeps the point closer to the circle.
    pub minor: Axis,
    /// Travel direction of the minor axis.
    pub minor_dir: Direction,
}

impl Octant {
    const fn new(major: Axis, major_dir: Direction, minor: Axis, minor_dir: Direction) -> Self {
        Self {
            major,
            major_dir,
            minor,
            minor_dir,
        }
    }
}

/// Counter-clockwise roles, indexed by octant number.
pub(super) const CCW: [Octant; 8] = [
    Octant::new(Y, Pos, X, Neg),
    Octant::new(X, Neg, Y, Pos),
    Octant::new(X, Neg, Y, Neg),
    Octant::new(Y, Neg, X, Neg),
    Octant::new(Y, Neg, X, Pos),
    Octant::new(X, Pos, Y, Neg),
    Octant::new(X, Pos, Y, Pos),
    Octant::new(Y, Pos, X, Pos),
];

/// Octant of a point relative to the circle center.
///
/// Boundaries belong to the octant that starts there.
pub(super) fn octant_of(x: i64, y: i64) -> usize {
    if y >= 0 && x > 0 {
        if y < x {
            0
        } else {
            1
        }
    } else if x <= 0 && y > 0 {
        if -x < y {
            2
        } else {
            3
        }
    } else if y <= 0 && x < 0 {
        if -y < -x {
            4
        } else {
            5
        }
    } else if x < -y {
        6
    } else {
        7
    }
}

/// Number of octant passes needed to go counter-clockwise from `start` to
/// `end`, both relative to the center.
///
/// When both points share an octant and `end` is not ahead of `start`, the
/// whole circle is traversed and the start octant is visited twice.
pub(super) fn span(start: [i64; 2], end: [i64; 2]) -> usize {
    let from = octant_of(start[0], start[1]);
    let to = octant_of(end[0], end[1]);
    let span = (8 + to - from) % 8 + 1;

    let ahead = start[0] * end[1] - start[1] * end[0] > 0;
    if span == 1 && !ahead {
        9
    } else {
        span
    }
}

/// Coordinate of `point` along an in-plane axis.
#[inline]
pub(super) fn coord(point: [i64; 2], axis: Axis) -> i64 {
    match axis {
        Axis::X => point[0],
        _ => point[1],
    }
}
