//! Step sequences and the motions that own them.

use alloc::vec::Vec;
use core::ops::Index;

use crate::error::MotionError;

use super::direction::{Axis, Direction};
use super::step::StepEvent;

/// Ordered, fully materialized list of step events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepSequence {
    events: Vec<StepEvent>,
}

impl StepSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Create an empty sequence with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    /// Append an event.
    #[inline]
    pub fn push(&mut self, event: StepEvent) {
        self.events.push(event);
    }

    /// Number of events.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the sequence holds no events.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&StepEvent> {
        self.events.get(index)
    }

    /// Last event, if any.
    #[inline]
    pub fn last_mut(&mut self) -> Option<&mut StepEvent> {
        self.events.last_mut()
    }

    /// Iterate over the events in order.
    pub fn iter(&self) -> core::slice::Iter<'_, StepEvent> {
        self.events.iter()
    }

    /// The events as a slice.
    pub fn as_slice(&self) -> &[StepEvent] {
        &self.events
    }

    /// Number of steps each axis takes over the whole sequence.
    pub fn step_counts(&self) -> [u32; 3] {
        let mut counts = [0u32; 3];
        for event in &self.events {
            for axis in Axis::ALL {
                if event.steps.get(axis) {
                    counts[axis.index()] += 1;
                }
            }
        }
        counts
    }

    /// Sum of all event delays in timer ticks.
    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| u64::from(e.ticks)).sum()
    }
}

impl From<Vec<StepEvent>> for StepSequence {
    fn from(events: Vec<StepEvent>) -> Self {
        Self { events }
    }
}

impl Index<usize> for StepSequence {
    type Output = StepEvent;

    fn index(&self, index: usize) -> &StepEvent {
        &self.events[index]
    }
}

impl<'a> IntoIterator for &'a StepSequence {
    type Item = &'a StepEvent;
    type IntoIter = core::slice::Iter<'a, StepEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// A single interpolated move, ready to be queued on the engine.
///
/// A `Motion` always holds at least one step event; builders report
/// [`MotionError::Degenerate`] instead of producing an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motion {
    /// Caller-supplied tag for correlation and logging.
    id: u16,
    /// Direction per axis, latched to the driver when the motion starts.
    initial_dirs: [Direction; 3],
    /// The step events, consumed strictly in order.
    sequence: StepSequence,
}

impl Motion {
    /// Create a motion from a prepared sequence.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Degenerate`] if the sequence is empty.
    pub fn new(
        id: u16,
        initial_dirs: [Direction; 3],
        sequence: StepSequence,
    ) -> core::result::Result<Self, MotionError> {
        if sequence.is_empty() {
            return Err(MotionError::Degenerate);
        }
        Ok(Self {
            id,
            initial_dirs,
            sequence,
        })
    }

    /// Get the motion id.
    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Get the initial direction of one axis.
    #[inline]
    pub fn initial_dir(&self, axis: Axis) -> Direction {
        self.initial_dirs[axis.index()]
    }

    /// Get the initial directions of all axes.
    #[inline]
    pub fn initial_dirs(&self) -> [Direction; 3] {
        self.initial_dirs
    }

    /// Get the step sequence.
    #[inline]
    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    /// Number of step events.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Always false for a constructed motion.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Steps taken per axis.
    pub fn step_counts(&self) -> [u32; 3] {
        self.sequence.step_counts()
    }

    /// Net displacement produced by replaying the sequence.
    ///
    /// Starts from the initial directions and applies direction flips after
    /// each slot's steps, exactly as the engine does.
    pub fn displacement(&self) -> [i32; 3] {
        let mut dirs = self.initial_dirs;
        let mut delta = [0i32; 3];
        for event in &self.sequence {
            for axis in Axis::ALL {
                let i = axis.index();
                if event.steps.get(axis) {
                    delta[i] += dirs[i].sign();
                }
                if event.flips.get(axis) {
                    dirs[i] = dirs[i].reversed();
                }
            }
        }
        delta
    }

    /// Total duration in timer ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.sequence.total_ticks()
    }

    /// Give up the sequence.
    pub fn into_sequence(self) -> StepSequence {
        self.sequence
    }
}
