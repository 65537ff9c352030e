//! Planner to engine example.
//!
//! Builds a small job with the motion planner, feeds it through the
//! two-slot queue and runs the engine from a simulated timer interrupt.
//!
//! The STEP/DIR pins and the step timer are simulated, so this runs on the host.

use cnc_motion::config::parse_config;
use cnc_motion::engine::{AxisPins, StepMode};
use cnc_motion::{
    Axis, Engine, MotionEvent, MotionPlanner, PinStepperDriver, Rotation, SharedEngine, StepRate,
    StepTimer, TickClock, TickOutcome,
};

/// Output pin counting rising edges.
#[derive(Debug, Default)]
struct SimPin {
    high: bool,
    rising_edges: u32,
}

impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for SimPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }
}

/// Pulse width delay; simulated time does not advance inside a pulse.
struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// One-shot timer that remembers when it is due to fire.
#[derive(Debug, Default)]
struct SimTimer {
    due_in: Option<u32>,
}

impl StepTimer for SimTimer {
    fn arm(&mut self, ticks: u32) {
        self.due_in = Some(ticks);
    }

    fn disable(&mut self) {
        self.due_in = None;
    }
}

type Driver = PinStepperDriver<SimPin, SimPin, NoDelay>;

static ENGINE: SharedEngine<Driver, SimTimer> = SharedEngine::empty();

const MACHINE_CONFIG: &str = r#"
[timer]
tick_period_ns = 30500

[motion]
rapid_rate = 800
max_rate = 1000
default_feed_rate = 300

[axes.x]
label = "table"

[axes.z]
label = "spindle"
invert_direction = true

[axes.z.limits]
min_steps = -400
max_steps = 0
policy = "clamp"
"#;

/// Fire the timer interrupt until the armed delay has elapsed.
///
/// Returns the number of ticks waited, or `None` if the timer is not armed.
fn wait_for_timer() -> Option<u32> {
    let ticks = ENGINE.with(|engine| engine.timer().due_in).flatten()?;
    ENGINE.on_timer_interrupt();
    Some(ticks)
}

fn main() -> cnc_motion::Result<()> {
    println!("=== Planner to Engine Example ===\n");

    let config = parse_config(MACHINE_CONFIG)?;
    let clock = TickClock::from_config(&config.timer);
    println!(
        "Tick period: {} ns, max step rate: {} steps/s",
        clock.tick_period_ns(),
        clock.max_rate().value()
    );

    let pins = Axis::ALL
        .map(|axis| AxisPins::from_config(SimPin::default(), SimPin::default(), config.axis(axis)));
    let driver = PinStepperDriver::new(pins, NoDelay, StepMode::default());
    ENGINE.init(Engine::from_config(driver, SimTimer::default(), &config));

    // Build the whole job up front; the planner chains absolute targets
    let mut planner = MotionPlanner::from_config(&config);
    let mut job = vec![
        planner.rapid_to([400, 0, 0])?,
        planner.linear_to_default([400, 0, -600])?,
        planner.arc_to([0, 400], [-400, 0], Rotation::CounterClockwise, StepRate(250))?,
        planner.linear_to([0, 0, -400], StepRate(150))?,
        planner.home()?,
    ];
    println!("Planned {} motions, final target {:?}\n", job.len(), planner.planned_position());
    for motion in &job {
        println!(
            "  #{}: {} events, {:?} steps, {} ticks",
            motion.id(),
            motion.len(),
            motion.step_counts(),
            motion.duration_ticks()
        );
    }
    job.reverse();

    let mut elapsed_ticks = 0u64;
    loop {
        // Foreground: keep the pending slot filled
        if let Some(motion) = job.pop() {
            if let Err(full) = ENGINE.enqueue(motion) {
                job.push(full.into_inner());
            }
        }

        for event in ENGINE.drain_events() {
            match event {
                MotionEvent::Started(id) => {
                    println!("\n[{:>8} ticks] motion #{} started", elapsed_ticks, id)
                }
                MotionEvent::Completed(id) => println!(
                    "[{:>8} ticks] motion #{} completed at {:?}",
                    elapsed_ticks,
                    id,
                    ENGINE.current_position()
                ),
                other => println!("[{:>8} ticks] {:?}", elapsed_ticks, other),
            }
        }

        if job.is_empty() && ENGINE.is_idle() {
            break;
        }

        match wait_for_timer() {
            Some(ticks) => elapsed_ticks += u64::from(ticks),
            None => {
                // Nothing armed: the engine is idle but the job is not done
                if ENGINE.on_timer_interrupt() == TickOutcome::Disabled {
                    break;
                }
            }
        }
    }

    println!("\n=== Result ===");
    println!("Position: {:?}", ENGINE.current_position());
    println!(
        "Simulated time: {:.3} s",
        clock.ns_for_ticks(elapsed_ticks) as f64 / 1e9
    );

    if let Some(engine) = ENGINE.take() {
        let (driver, _) = engine.release();
        let (pins, _) = driver.release();
        for (axis, pins) in Axis::ALL.iter().zip(pins.iter()) {
            println!("{} STEP pulses: {}", axis.name(), pins.step.rising_edges);
        }
    }

    Ok(())
}
