//! Integration tests for cnc-motion.
//!
//! These tests verify the complete workflow from configuration to motion
//! building and timer-driven execution.

use cnc_motion::config::parse_config;
use cnc_motion::engine::Progress;
use cnc_motion::{
    ArcMove, Axis, Direction, Engine, Interpolator, MachineConfig, MotionEvent, MotionPlanner,
    Rotation, SharedEngine, StepRate, StepTimer, StepperDriver, TickClock, TickOutcome,
};
use proptest::prelude::*;

// =============================================================================
// Test collaborators
// =============================================================================

#[derive(Debug, Default)]
struct RecordingDriver {
    dirs: [Direction; 3],
    pulses: [u32; 3],
}

impl StepperDriver for RecordingDriver {
    type Error = ();

    fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<(), ()> {
        self.dirs[axis.index()] = direction;
        Ok(())
    }

    fn direction(&self, axis: Axis) -> Direction {
        self.dirs[axis.index()]
    }

    fn pulse_step(&mut self, axis: Axis) -> Result<(), ()> {
        self.pulses[axis.index()] += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RecordingTimer {
    armed: Vec<u32>,
    disabled: u32,
}

impl StepTimer for RecordingTimer {
    fn arm(&mut self, ticks: u32) {
        self.armed.push(ticks);
    }

    fn disable(&mut self) {
        self.disabled += 1;
    }
}

fn interpolator() -> Interpolator {
    Interpolator::new(TickClock::default(), StepRate(400), StepRate(400))
}

fn engine() -> Engine<RecordingDriver, RecordingTimer> {
    Engine::new(RecordingDriver::default(), RecordingTimer::default(), true)
}

/// Tick until the engine is idle, returning the number of ticks.
fn run_to_idle(engine: &mut Engine<RecordingDriver, RecordingTimer>) -> usize {
    let mut ticks = 0;
    while !engine.is_idle() {
        engine.tick();
        ticks += 1;
        assert!(ticks < 1_000_000, "engine never went idle");
    }
    ticks
}

// =============================================================================
// Step count conservation and direction consistency
// =============================================================================

proptest! {
    #[test]
    fn rapid_conserves_steps(dx in -300i32..300, dy in -300i32..300, dz in -300i32..300) {
        prop_assume!(dx != 0 || dy != 0 || dz != 0);
        let motion = interpolator().rapid(1, [dx, dy, dz]).unwrap();

        prop_assert_eq!(
            motion.step_counts(),
            [dx.unsigned_abs(), dy.unsigned_abs(), dz.unsigned_abs()]
        );
        prop_assert_eq!(motion.displacement(), [dx, dy, dz]);
        for (axis, d) in Axis::ALL.iter().zip([dx, dy, dz]) {
            prop_assert_eq!(motion.initial_dir(*axis) == Direction::Forward, d > 0);
        }
    }

    #[test]
    fn linear_conserves_steps(
        dx in -300i32..300,
        dy in -300i32..300,
        dz in -300i32..300,
        feed in 50u32..2000,
    ) {
        prop_assume!(dx != 0 || dy != 0 || dz != 0);
        let motion = interpolator().linear(1, [dx, dy, dz], StepRate(feed)).unwrap();

        prop_assert_eq!(
            motion.step_counts(),
            [dx.unsigned_abs(), dy.unsigned_abs(), dz.unsigned_abs()]
        );
        prop_assert_eq!(motion.displacement(), [dx, dy, dz]);
        prop_assert!(motion.sequence().iter().all(|e| e.ticks >= 1 && !e.flips.any()));
        for (axis, d) in Axis::ALL.iter().zip([dx, dy, dz]) {
            prop_assert_eq!(motion.initial_dir(*axis) == Direction::Forward, d > 0);
        }
    }
}

// =============================================================================
// Tick accounting
// =============================================================================

#[test]
fn linear_duration_matches_feed() {
    let clock = TickClock::default();
    for (delta, feed) in [([120, 50, 0], 130), ([-40, 0, 30], 100), ([0, 0, 77], 200)] {
        let motion = interpolator().linear(1, delta, StepRate(feed)).unwrap();

        let distance = delta.iter().map(|&d| f64::from(d * d)).sum::<f64>().sqrt();
        let move_ns = 1e9 * distance / f64::from(feed);
        let scheduled_ns = clock.ns_for_ticks(motion.duration_ticks()) as f64;
        let tick_ns = f64::from(clock.tick_period_ns());

        assert!(
            scheduled_ns >= move_ns - 1.0 && scheduled_ns <= move_ns + tick_ns,
            "delta {:?}: scheduled {} ns, expected {} ns",
            delta,
            scheduled_ns,
            move_ns
        );
    }
}

// =============================================================================
// Arc closure
// =============================================================================

#[test]
fn quarter_arc_ends_near_analytic_endpoint() {
    let arc = ArcMove {
        end: [-100, 100],
        center: [-100, 0],
        rotation: Rotation::CounterClockwise,
        feed: StepRate(200),
    };
    let motion = interpolator().arc(1, &arc).unwrap();
    let [x, y, z] = motion.displacement();
    assert!((x + 100).abs() <= 1, "x {}", x);
    assert!((y - 100).abs() <= 1, "y {}", y);
    assert_eq!(z, 0);

    // Executed path lands where the sequence says
    let mut engine = engine();
    engine.enqueue(motion).unwrap();
    run_to_idle(&mut engine);
    assert_eq!(engine.current_position(), [x, y, 0]);
}

#[test]
fn arcs_in_both_rotations_return_home() {
    let clockwise = ArcMove {
        end: [60, 60],
        center: [60, 0],
        rotation: Rotation::Clockwise,
        feed: StepRate(300),
    };
    let back = ArcMove {
        end: [-60, -60],
        center: [0, -60],
        rotation: Rotation::CounterClockwise,
        feed: StepRate(300),
    };

    let mut engine = engine();
    for (id, arc) in [(1, &clockwise), (2, &back)] {
        engine.enqueue(interpolator().arc(id, arc).unwrap()).unwrap();
        run_to_idle(&mut engine);
    }

    let [x, y, _] = engine.current_position();
    assert!(x.abs() <= 2 && y.abs() <= 2, "ended at {:?}", [x, y]);
}

// =============================================================================
// Queue promotion and backpressure
// =============================================================================

#[test]
fn pending_motion_promoted_after_drain() {
    let mut engine = engine();
    let interp = interpolator();

    engine.enqueue(interp.rapid(1, [25, 0, 0]).unwrap()).unwrap();
    engine.tick();
    engine.tick();
    engine.enqueue(interp.rapid(2, [0, -3, 0]).unwrap()).unwrap();

    let mut completed = None;
    for _ in 0..100 {
        if let TickOutcome::Completed { id, next } = engine.tick() {
            completed = Some((id, next));
            break;
        }
    }

    assert_eq!(completed, Some((1, Some(2))));
    assert_eq!(
        engine.progress(),
        Some(Progress {
            id: 2,
            executed: 0,
            total: 3
        })
    );
    assert!(engine.queue().pending().is_none());

    run_to_idle(&mut engine);
    assert_eq!(engine.current_position(), [25, -3, 0]);
}

#[test]
fn enqueue_refused_while_pending_occupied() {
    let mut engine = engine();
    let interp = interpolator();

    engine.enqueue(interp.rapid(1, [4, 0, 0]).unwrap()).unwrap();
    engine.tick();
    engine.enqueue(interp.rapid(2, [4, 0, 0]).unwrap()).unwrap();

    let retry = engine.enqueue(interp.rapid(3, [0, 4, 0]).unwrap()).unwrap_err();
    assert!(engine.is_full());
    assert_eq!(engine.queue().current().map(|m| m.id()), Some(1));
    assert_eq!(engine.queue().pending().map(|m| m.id()), Some(2));

    // Drain motion 1, which promotes 2 and frees the pending slot
    let mut outcome = engine.tick();
    while outcome == TickOutcome::Stepped {
        outcome = engine.tick();
    }
    assert!(engine.enqueue(retry.into_inner()).is_ok());

    run_to_idle(&mut engine);
    assert_eq!(engine.current_position(), [8, 4, 0]);
}

// =============================================================================
// Emergency stop
// =============================================================================

#[test]
fn emergency_stop_mid_sequence() {
    let mut engine = engine();
    let interp = interpolator();

    engine.enqueue(interp.linear(1, [50, 50, 0], StepRate(200)).unwrap()).unwrap();
    for _ in 0..10 {
        engine.tick();
    }
    engine.enqueue(interp.rapid(2, [0, 0, 10]).unwrap()).unwrap();
    let before = engine.driver().pulses;

    engine.emergency_stop();
    assert!(engine.is_idle());
    assert_eq!(engine.timer().disabled, 1);

    // A late expiry must not step
    assert_eq!(engine.tick(), TickOutcome::Idle);
    assert_eq!(engine.driver().pulses, before);

    // Position keeps the steps already taken
    let pos = engine.current_position();
    assert_eq!(pos, [before[0] as i32, before[1] as i32, 0]);

    // Retract right away
    engine.enqueue(interp.rapid(3, [0, 0, 5]).unwrap()).unwrap();
    run_to_idle(&mut engine);
    assert_eq!(engine.current_position()[2], 5);
}

// =============================================================================
// Shared engine and planner workflow
// =============================================================================

const MACHINE_CONFIG: &str = r#"
[timer]
tick_period_ns = 30500

[motion]
rapid_rate = 800
max_rate = 1000
default_feed_rate = 250

[axes.z]
label = "spindle"

[axes.z.limits]
min_steps = -500
max_steps = 0
policy = "clamp"
"#;

#[test]
fn planner_and_shared_engine_workflow() {
    let config: MachineConfig = parse_config(MACHINE_CONFIG).unwrap();
    let mut planner = MotionPlanner::from_config(&config);
    let engine = SharedEngine::new(Engine::from_config(
        RecordingDriver::default(),
        RecordingTimer::default(),
        &config,
    ));

    let mut queue = vec![
        planner.rapid_to([200, 100, 0]).unwrap(),
        planner.linear_to_default([300, 150, -900]).unwrap(),
        planner.home().unwrap(),
    ];
    assert_eq!(planner.planned_position(), [0, 0, 0]);
    queue.reverse();

    let mut ticks = 0;
    while !(queue.is_empty() && engine.is_idle()) {
        if let Some(motion) = queue.pop() {
            if let Err(full) = engine.enqueue(motion) {
                queue.push(full.into_inner());
            }
        }
        engine.on_timer_interrupt();
        ticks += 1;
        assert!(ticks < 1_000_000);
    }

    assert_eq!(engine.current_position(), [0, 0, 0]);

    let completed: Vec<u16> = engine
        .drain_events()
        .iter()
        .filter_map(|e| match e {
            MotionEvent::Completed(id) => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(completed, [1, 2, 3]);

    let (driver, _) = engine.into_inner().unwrap().release();
    // Z was clamped to -500 on the way down
    assert_eq!(driver.pulses[2], 1000);
}

#[test]
fn stopped_engine_resumes_where_it_left_off() {
    let engine = SharedEngine::new(engine());
    engine
        .enqueue(interpolator().rapid(1, [6, 0, 0]).unwrap())
        .unwrap();

    engine.on_timer_interrupt();
    engine.on_timer_interrupt();
    engine.on_timer_interrupt();
    engine.stop();
    assert_eq!(engine.on_timer_interrupt(), TickOutcome::Disabled);
    assert_eq!(engine.current_position(), [2, 0, 0]);

    engine.start();
    while !engine.is_idle() {
        engine.on_timer_interrupt();
    }
    assert_eq!(engine.current_position(), [6, 0, 0]);
    assert!(engine.set_origin().is_ok());
    assert_eq!(engine.current_position(), [0, 0, 0]);
}

static MACHINE: SharedEngine<RecordingDriver, RecordingTimer> = SharedEngine::empty();

#[test]
fn static_handle_ignores_ticks_until_installed() {
    let motion = interpolator().linear(1, [30, -10, 0], StepRate(300)).unwrap();
    let events = motion.len();

    assert_eq!(MACHINE.on_timer_interrupt(), TickOutcome::Disabled);
    let motion = MACHINE.enqueue(motion).unwrap_err().into_inner();
    assert!(MACHINE.is_idle());

    MACHINE.init(engine());
    MACHINE.enqueue(motion).unwrap();
    while !MACHINE.is_idle() {
        MACHINE.on_timer_interrupt();
    }
    assert_eq!(MACHINE.current_position(), [30, -10, 0]);

    let engine = MACHINE.take().unwrap();
    assert_eq!(engine.driver().pulses, [30, 10, 0]);
    // Enqueue kick, promotion, then one re-arm per event
    assert_eq!(engine.timer().armed.len(), 2 + events);
}
