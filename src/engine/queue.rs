//! Two-slot motion queue: one executing motion, one pending.

use core::fmt;

use crate::motion::{Motion, StepEvent};

/// Backpressure signal: the pending slot is occupied.
///
/// Hands the rejected motion back so the caller can retry later without
/// rebuilding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFull(pub Motion);

impl QueueFull {
    /// Take back the rejected motion.
    pub fn into_inner(self) -> Motion {
        self.0
    }
}

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Motion queue full, motion #{} not queued", self.0.id())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QueueFull {}

/// Executing and pending motion plus the cursor into the executing one.
#[derive(Debug, Clone, Default)]
pub struct MotionQueue {
    current: Option<Motion>,
    pending: Option<Motion>,
    /// Index of the next event of `current` to execute.
    cursor: usize,
}

impl MotionQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            current: None,
            pending: None,
            cursor: 0,
        }
    }

    /// Get the executing motion.
    #[inline]
    pub fn current(&self) -> Option<&Motion> {
        self.current.as_ref()
    }

    /// Get the pending motion.
    #[inline]
    pub fn pending(&self) -> Option<&Motion> {
        self.pending.as_ref()
    }

    /// Index of the next event of the executing motion.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True if both slots are empty.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.pending.is_none()
    }

    /// True if a submission would be refused.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.pending.is_some()
    }

    /// Put a motion into the pending slot.
    ///
    /// # Errors
    ///
    /// Returns the motion inside [`QueueFull`] if the slot is occupied; the
    /// queue is left untouched.
    pub fn submit(&mut self, motion: Motion) -> Result<(), QueueFull> {
        if self.pending.is_some() {
            return Err(QueueFull(motion));
        }
        self.pending = Some(motion);
        Ok(())
    }

    /// Move the pending motion into the empty executing slot.
    ///
    /// Returns the promoted motion, or `None` if nothing moved.
    pub fn promote(&mut self) -> Option<&Motion> {
        if self.current.is_some() {
            return None;
        }
        self.current = Some(self.pending.take()?);
        self.cursor = 0;
        self.current.as_ref()
    }

    /// Event at the cursor of the executing motion.
    #[inline]
    pub fn next_event(&self) -> Option<&StepEvent> {
        self.current.as_ref()?.sequence().get(self.cursor)
    }

    /// Move the cursor past the event just executed.
    #[inline]
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Release the executing motion.
    pub fn complete(&mut self) -> Option<Motion> {
        self.cursor = 0;
        self.current.take()
    }

    /// Drop both motions, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        self.cursor = 0;
        usize::from(self.current.take().is_some()) + usize::from(self.pending.take().is_some())
    }
}
