//! Timer-tick execution engine.
//!
//! [`Engine::tick`] runs once per timer expiry and does O(1) work: it executes
//! at most one step event, or completes a motion and promotes the next one,
//! then re-arms the one-shot timer for the next due event.

use crate::config::MachineConfig;
use crate::error::{MotionError, Result};
use crate::motion::{Axis, Motion};

use super::events::{EventLog, MotionEvent};
use super::hal::{StepTimer, StepperDriver};
use super::position::MachinePosition;
use super::queue::{MotionQueue, QueueFull};

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Motion is disabled; nothing done, timer not re-armed.
    Disabled,
    /// No motion executing or pending.
    Idle,
    /// One step event executed.
    Stepped,
    /// The executing motion finished; `next` was promoted in its place.
    Completed {
        /// Id of the finished motion.
        id: u16,
        /// Id of the motion promoted in the same tick.
        next: Option<u16>,
    },
    /// The pending motion was promoted into an empty executing slot.
    Promoted(u16),
    /// The driver failed; the engine performed an emergency stop.
    Faulted,
}

/// Progress of the executing motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Progress {
    /// Motion id.
    pub id: u16,
    /// Step events already executed.
    pub executed: usize,
    /// Total step events.
    pub total: usize,
}

/// Motion execution engine.
///
/// Owns the queue, the machine position and both collaborators. Foreground
/// code and the timer interrupt must not call into it concurrently; see
/// [`SharedEngine`](super::SharedEngine).
pub struct Engine<D, T>
where
    D: StepperDriver,
    T: StepTimer,
{
    driver: D,
    timer: T,
    queue: MotionQueue,
    position: MachinePosition,
    /// Global motion enable, cleared by stop.
    enabled: bool,
    /// True while the timer has an expiry outstanding.
    armed: bool,
    events: EventLog,
}

impl<D, T> Engine<D, T>
where
    D: StepperDriver,
    T: StepTimer,
{
    /// Create an idle engine at the origin.
    pub fn new(driver: D, timer: T, enabled: bool) -> Self {
        Self {
            driver,
            timer,
            queue: MotionQueue::new(),
            position: MachinePosition::new(),
            enabled,
            armed: false,
            events: EventLog::new(),
        }
    }

    /// Create an engine, enabled if the configuration asks for auto start.
    pub fn from_config(driver: D, timer: T, config: &MachineConfig) -> Self {
        Self::new(driver, timer, config.motion.auto_start)
    }

    /// Handle one timer expiry.
    pub fn tick(&mut self) -> TickOutcome {
        self.armed = false;

        if !self.enabled {
            return TickOutcome::Disabled;
        }

        if self.queue.current().is_some() {
            return self.step_current();
        }

        match self.promote_pending() {
            Some(id) => TickOutcome::Promoted(id),
            None => TickOutcome::Idle,
        }
    }

    /// Queue a motion behind the executing one.
    ///
    /// An enabled engine with nothing executing is kicked so the motion is
    /// promoted on the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`QueueFull`] with the motion if the pending slot is occupied.
    pub fn enqueue(&mut self, motion: Motion) -> core::result::Result<(), QueueFull> {
        let id = motion.id();
        if let Err(full) = self.queue.submit(motion) {
            debug!("queue full, motion #{} not queued", id);
            return Err(full);
        }
        trace!("motion #{} queued", id);

        if self.enabled && self.queue.current().is_none() && !self.armed {
            self.arm(1);
        }
        Ok(())
    }

    /// Enable motion execution and re-arm for outstanding work.
    pub fn start(&mut self) {
        if !self.enabled {
            info!("motion enabled");
        }
        self.enabled = true;

        if !self.armed {
            if let Some(ticks) = self.resume_ticks() {
                self.arm(ticks);
            }
        }
    }

    /// Disable motion execution. Queued motions are kept.
    pub fn stop(&mut self) {
        if self.enabled {
            info!("motion disabled");
        }
        self.enabled = false;
        self.timer.disable();
        self.armed = false;
    }

    /// Disable the timer and discard the executing and pending motions.
    ///
    /// The enable flag is left as is, so a retract can be queued right away.
    /// The machine position keeps every step already taken.
    pub fn emergency_stop(&mut self) {
        self.timer.disable();
        self.armed = false;
        let discarded = self.queue.clear();
        warn!("emergency stop, {} motions discarded", discarded);
        self.events.push(MotionEvent::EmergencyStop {
            discarded: discarded as u8,
        });
    }

    /// True if motion execution is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True if no motion is executing or pending.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.queue.is_idle()
    }

    /// True if a call to [`enqueue`](Self::enqueue) would be refused.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Snapshot of the machine position.
    #[inline]
    pub fn current_position(&self) -> [i32; 3] {
        self.position.as_array()
    }

    /// Get the machine position.
    #[inline]
    pub fn position(&self) -> &MachinePosition {
        &self.position
    }

    /// Zero the machine position.
    ///
    /// # Errors
    ///
    /// [`MotionError::Busy`] unless the engine is idle.
    pub fn set_origin(&mut self) -> Result<()> {
        if !self.is_idle() {
            return Err(MotionError::Busy.into());
        }
        self.position.set_origin();
        info!("origin set");
        Ok(())
    }

    /// Progress of the executing motion.
    pub fn progress(&self) -> Option<Progress> {
        self.queue.current().map(|motion| Progress {
            id: motion.id(),
            executed: self.queue.cursor(),
            total: motion.len(),
        })
    }

    /// Get the motion queue.
    #[inline]
    pub fn queue(&self) -> &MotionQueue {
        &self.queue
    }

    /// Take the oldest recorded event.
    #[inline]
    pub fn pop_event(&mut self) -> Option<MotionEvent> {
        self.events.pop()
    }

    /// Events lost to log overflow.
    #[inline]
    pub fn dropped_events(&self) -> u32 {
        self.events.dropped()
    }

    /// Get the stepper driver.
    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get the step timer.
    #[inline]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Release the collaborators.
    pub fn release(self) -> (D, T) {
        (self.driver, self.timer)
    }

    fn step_current(&mut self) -> TickOutcome {
        let Some(motion) = self.queue.current() else {
            return TickOutcome::Idle;
        };
        let id = motion.id();
        let dirs = motion.initial_dirs();
        let cursor = self.queue.cursor();
        let event = self.queue.next_event().copied();

        if cursor == 0 {
            for axis in Axis::ALL {
                if self.driver.set_direction(axis, dirs[axis.index()]).is_err() {
                    return self.fault(axis);
                }
            }
            info!("motion #{} started", id);
            self.events.push(MotionEvent::Started(id));
        }

        let Some(event) = event else {
            self.queue.complete();
            info!("motion #{} completed", id);
            self.events.push(MotionEvent::Completed(id));
            let next = self.promote_pending();
            return TickOutcome::Completed { id, next };
        };

        for axis in Axis::ALL {
            if event.steps.get(axis) {
                if self.driver.pulse_step(axis).is_err() {
                    return self.fault(axis);
                }
                self.position.step(axis, self.driver.direction(axis));
            }
        }

        for axis in Axis::ALL {
            if event.flips.get(axis) {
                let reversed = self.driver.direction(axis).reversed();
                if self.driver.set_direction(axis, reversed).is_err() {
                    return self.fault(axis);
                }
            }
        }

        self.queue.advance();

        // After the last event, one more tick completes the motion
        let ticks = self.queue.next_event().map_or(1, |e| e.ticks);
        self.arm(ticks);
        TickOutcome::Stepped
    }

    fn promote_pending(&mut self) -> Option<u16> {
        let motion = self.queue.promote()?;
        let id = motion.id();
        let ticks = motion.sequence().get(0).map_or(1, |e| e.ticks);

        debug!("motion #{} promoted, {} events", id, motion.len());
        self.events.push(MotionEvent::Promoted(id));
        self.arm(ticks);
        Some(id)
    }

    /// Ticks until the next thing to do, if anything is outstanding.
    fn resume_ticks(&self) -> Option<u32> {
        if self.queue.current().is_some() {
            Some(self.queue.next_event().map_or(1, |e| e.ticks))
        } else if self.queue.pending().is_some() {
            Some(1)
        } else {
            None
        }
    }

    fn fault(&mut self, axis: Axis) -> TickOutcome {
        warn!("stepper driver fault on {} axis", axis.name());
        self.emergency_stop();
        self.events.push(MotionEvent::Fault(axis));
        TickOutcome::Faulted
    }

    fn arm(&mut self, ticks: u32) {
        self.timer.arm(ticks.max(1));
        self.armed = true;
    }
}
