//! Motion notifications recorded by the engine.

use heapless::Deque;

use crate::motion::Axis;

/// Number of events kept before the oldest is dropped.
pub const EVENT_LOG_CAPACITY: usize = 16;

/// Something the engine did that foreground code may want to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionEvent {
    /// Motion moved from the pending to the executing slot.
    Promoted(u16),
    /// First step event of a motion executed, directions latched.
    Started(u16),
    /// Every step event of a motion executed.
    Completed(u16),
    /// Both slots were cleared.
    EmergencyStop {
        /// Number of motions discarded.
        discarded: u8,
    },
    /// Stepper driver failed on an axis; the engine stopped.
    Fault(Axis),
}

/// Bounded event log, oldest entries dropped on overflow.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Deque<MotionEvent, EVENT_LOG_CAPACITY>,
    dropped: u32,
}

impl EventLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
            dropped: 0,
        }
    }

    /// Record an event, dropping the oldest if full.
    pub fn push(&mut self, event: MotionEvent) {
        if self.events.is_full() {
            self.events.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        // Cannot fail after making room
        let _ = self.events.push_back(event);
    }

    /// Take the oldest event.
    #[inline]
    pub fn pop(&mut self) -> Option<MotionEvent> {
        self.events.pop_front()
    }

    /// Number of events waiting.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if no event is waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events lost to overflow since creation.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
