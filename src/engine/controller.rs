//! Engine handle shared between foreground code and the timer interrupt.
//!
//! Every access runs inside a critical section, so the foreground check-and-set
//! on the pending slot can never interleave with a tick.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Vec;

use crate::error::Result;
use crate::motion::Motion;

use super::events::{MotionEvent, EVENT_LOG_CAPACITY};
use super::executor::{Engine, Progress, TickOutcome};
use super::hal::{StepTimer, StepperDriver};
use super::queue::QueueFull;

/// [`Engine`] behind a critical-section mutex.
///
/// The handle starts empty so it can live in a `static`; the engine is
/// installed once the driver and timer exist:
///
/// ```rust,ignore
/// static ENGINE: SharedEngine<Driver, Timer> = SharedEngine::empty();
///
/// fn main() {
///     ENGINE.init(Engine::new(driver, timer, true));
///     // ...
/// }
///
/// #[interrupt]
/// fn TIMER0() {
///     ENGINE.on_timer_interrupt();
/// }
/// ```
///
/// Until an engine is installed, ticks report [`TickOutcome::Disabled`],
/// `enqueue` hands the motion back and the other operations do nothing.
pub struct SharedEngine<D, T>
where
    D: StepperDriver,
    T: StepTimer,
{
    inner: Mutex<RefCell<Option<Engine<D, T>>>>,
}

impl<D, T> SharedEngine<D, T>
where
    D: StepperDriver,
    T: StepTimer,
{
    /// Handle with no engine installed.
    pub const fn empty() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Wrap an engine.
    pub const fn new(engine: Engine<D, T>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Some(engine))),
        }
    }

    /// Install `engine`, returning the one it replaces.
    pub fn init(&self, engine: Engine<D, T>) -> Option<Engine<D, T>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(engine))
    }

    /// Remove the installed engine.
    pub fn take(&self) -> Option<Engine<D, T>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Whether an engine is installed.
    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    /// Run `f` with exclusive access to the engine, if one is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine<D, T>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Timer interrupt entry point.
    pub fn on_timer_interrupt(&self) -> TickOutcome {
        self.with(Engine::tick).unwrap_or(TickOutcome::Disabled)
    }

    /// See [`Engine::enqueue`]. Without an engine the motion is handed back.
    pub fn enqueue(&self, motion: Motion) -> core::result::Result<(), QueueFull> {
        critical_section::with(|cs| match self.inner.borrow_ref_mut(cs).as_mut() {
            Some(engine) => engine.enqueue(motion),
            None => Err(QueueFull(motion)),
        })
    }

    /// See [`Engine::start`].
    pub fn start(&self) {
        self.with(Engine::start);
    }

    /// See [`Engine::stop`].
    pub fn stop(&self) {
        self.with(Engine::stop);
    }

    /// See [`Engine::emergency_stop`].
    pub fn emergency_stop(&self) {
        self.with(Engine::emergency_stop);
    }

    /// See [`Engine::current_position`]; the origin without an engine.
    pub fn current_position(&self) -> [i32; 3] {
        self.with(|engine| engine.current_position()).unwrap_or([0; 3])
    }

    /// See [`Engine::is_idle`].
    pub fn is_idle(&self) -> bool {
        self.with(|engine| engine.is_idle()).unwrap_or(true)
    }

    /// See [`Engine::is_enabled`].
    pub fn is_enabled(&self) -> bool {
        self.with(|engine| engine.is_enabled()).unwrap_or(false)
    }

    /// See [`Engine::progress`].
    pub fn progress(&self) -> Option<Progress> {
        self.with(|engine| engine.progress()).flatten()
    }

    /// See [`Engine::set_origin`].
    pub fn set_origin(&self) -> Result<()> {
        self.with(Engine::set_origin).unwrap_or(Ok(()))
    }

    /// Take every recorded event, oldest first.
    pub fn drain_events(&self) -> Vec<MotionEvent, EVENT_LOG_CAPACITY> {
        self.with(|engine| {
            let mut drained = Vec::new();
            while let Some(event) = engine.pop_event() {
                // The log never holds more than its capacity
                let _ = drained.push(event);
            }
            drained
        })
        .unwrap_or_default()
    }

    /// Unwrap the engine, if one is installed.
    pub fn into_inner(self) -> Option<Engine<D, T>> {
        self.inner.into_inner().into_inner()
    }
}

impl<D, T> Default for SharedEngine<D, T>
where
    D: StepperDriver,
    T: StepTimer,
{
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Axis, AxisFlags, Direction, StepEvent, StepSequence};

    #[derive(Default)]
    struct CountingDriver {
        steps: u32,
    }

    impl StepperDriver for CountingDriver {
        type Error = core::convert::Infallible;

        fn set_direction(
            &mut self,
            _axis: Axis,
            _direction: Direction,
        ) -> core::result::Result<(), Self::Error> {
            Ok(())
        }

        fn direction(&self, _axis: Axis) -> Direction {
            Direction::Forward
        }

        fn pulse_step(&mut self, _axis: Axis) -> core::result::Result<(), Self::Error> {
            self.steps += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct NullTimer;

    impl StepTimer for NullTimer {
        fn arm(&mut self, _ticks: u32) {}
        fn disable(&mut self) {}
    }

    #[test]
    fn test_shared_engine_runs_motion() {
        let engine = SharedEngine::new(Engine::new(CountingDriver::default(), NullTimer, true));

        let mut seq = StepSequence::new();
        seq.push(StepEvent::new(1, AxisFlags::from_array([true, true, false])));
        let motion = Motion::new(5, [Direction::Forward; 3], seq).unwrap();

        engine.enqueue(motion).unwrap();
        assert!(!engine.is_idle());

        while !engine.is_idle() {
            engine.on_timer_interrupt();
        }

        assert_eq!(engine.current_position(), [1, 1, 0]);
        assert_eq!(
            engine.drain_events().as_slice(),
            [
                MotionEvent::Promoted(5),
                MotionEvent::Started(5),
                MotionEvent::Completed(5)
            ]
        );
        assert_eq!(engine.into_inner().unwrap().release().0.steps, 2);
    }

    static ENGINE: SharedEngine<CountingDriver, NullTimer> = SharedEngine::empty();

    #[test]
    fn test_static_handle_installed_later() {
        let mut seq = StepSequence::new();
        seq.push(StepEvent::new(2, AxisFlags::from_array([false, false, true])));
        seq.push(StepEvent::new(2, AxisFlags::from_array([false, false, true])));
        let motion = Motion::new(7, [Direction::Forward; 3], seq).unwrap();

        // Nothing to drive yet
        assert!(!ENGINE.is_initialized());
        assert_eq!(ENGINE.on_timer_interrupt(), TickOutcome::Disabled);
        let motion = ENGINE.enqueue(motion).unwrap_err().into_inner();

        assert!(ENGINE
            .init(Engine::new(CountingDriver::default(), NullTimer, true))
            .is_none());
        ENGINE.enqueue(motion).unwrap();
        while !ENGINE.is_idle() {
            ENGINE.on_timer_interrupt();
        }

        assert_eq!(ENGINE.current_position(), [0, 0, 2]);
        let engine = ENGINE.take().unwrap();
        assert_eq!(engine.driver().steps, 2);
        assert!(!ENGINE.is_initialized());
    }
}
