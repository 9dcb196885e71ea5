// Polling thread driving real step/dir pins against the host clock

#![cfg(feature = "std")]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use puckbot_core::config::AxisConfig;
use puckbot_core::motion::AxisMotionController;
use puckbot_core::traits::{ManualClock, NullOutput};
use puckbot_drivers::clock::StdClock;
use puckbot_drivers::runner::AxisRunner;

const TIMEOUT: Duration = Duration::from_secs(30);

fn wait_settled<M, O, C>(axis: &AxisMotionController<M, O, C>)
where
    M: embassy_sync::blocking_mutex::raw::RawMutex,
    O: puckbot_core::traits::StepOutput,
    C: puckbot_core::traits::TickClock,
{
    let start = Instant::now();
    while !axis.status().is_settled() {
        assert!(start.elapsed() < TIMEOUT, "axis did not settle");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_runner_reaches_target_in_real_time() {
    let mut config = AxisConfig::new(4000.0, 40_000.0);
    config.name.push_str("x").unwrap();

    let axis = Arc::new(
        AxisMotionController::<CriticalSectionRawMutex, _, _>::new(&config, NullOutput, StdClock::new()).unwrap(),
    );
    let runner = AxisRunner::spawn(axis.clone()).unwrap();
    assert!(runner.is_running());

    let start = Instant::now();
    axis.move_to(400);
    wait_settled(&axis);

    // 400 steps cannot be done faster than the ramp allows
    assert!(start.elapsed() >= Duration::from_millis(150));
    assert_eq!(axis.current_position(), 400);

    let polls = runner.shutdown().unwrap();
    assert!(polls > 400);
}

#[test]
fn test_retarget_while_runner_polls() {
    static CLOCK: ManualClock = ManualClock::new(0);

    let axis = Arc::new(
        AxisMotionController::<CriticalSectionRawMutex, _, _>::new(
            &AxisConfig::new(20_000.0, 200_000.0),
            NullOutput,
            &CLOCK,
        )
        .unwrap(),
    );
    let runner = AxisRunner::spawn(axis.clone()).unwrap();

    // Clock moves on this thread, polling happens on the runner
    axis.move_to(-300);
    let start = Instant::now();
    while !axis.status().is_settled() {
        assert!(start.elapsed() < TIMEOUT, "axis did not settle");
        CLOCK.advance(500);
        thread::yield_now();
    }
    assert_eq!(axis.current_position(), -300);

    drop(runner);
    assert_eq!(axis.speed(), 0.0);
}
