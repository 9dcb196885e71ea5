// Velocity profile tests for the discrete acceleration ramp

use puckbot_core::motion::AccelRamp;
use puckbot_core::traits::TICKS_PER_SECOND;

/// Everything recorded while driving a ramp to rest
struct Trace {
    /// Step interval planned after each step
    intervals: Vec<u64>,
    /// Signed speed after each step
    speeds: Vec<f64>,
    /// Clock value when the ramp came to rest
    end: u64,
}

/// Set a target and poll every `dt` ticks until the ramp settles
fn drive(ramp: &mut AccelRamp, target: i64, start: u64, dt: u64) -> Trace {
    ramp.move_to(target);

    let mut trace = Trace {
        intervals: Vec::new(),
        speeds: Vec::new(),
        end: start,
    };
    let mut now = start;
    for _ in 0..100_000_000u64 {
        now += dt;
        if ramp.run(now).is_some() {
            trace.intervals.push(ramp.step_interval());
            trace.speeds.push(ramp.speed());
        }
        if !ramp.is_running() {
            trace.end = now;
            return trace;
        }
    }
    panic!("ramp did not settle");
}

fn ramp() -> AccelRamp {
    AccelRamp::new(1000.0, 5000.0).unwrap()
}

#[test]
fn test_trapezoid_shape() {
    let mut ramp = ramp();
    let trace = drive(&mut ramp, 1000, 0, 100);
    let iv = &trace.intervals;

    assert_eq!(iv.len(), 1000);
    assert_eq!(ramp.current_position(), 1000);

    // Accelerate
    assert!(iv[..100].windows(2).all(|w| w[0] > w[1]));
    // Cruise at max speed
    assert!(iv[99..899].iter().all(|&i| i == 10_000));
    // Decelerate
    assert!(iv[898..999].windows(2).all(|w| w[0] < w[1]));
    // Stopped
    assert_eq!(iv[999], 0);
    assert_eq!(trace.end, 11_880_000);
}

#[test]
fn test_triangle_never_reaches_max_speed() {
    let mut ramp = ramp();
    let trace = drive(&mut ramp, 100, 0, 100);

    assert_eq!(trace.intervals.len(), 100);
    let peak = trace.speeds.iter().cloned().fold(0.0, f64::max);
    assert!(peak > 700.0 && peak < 1000.0, "peak {peak}");
    assert_eq!(trace.end, 2_577_900);
}

#[test]
fn test_profile_is_symmetric() {
    let mut ramp = ramp();
    let out = drive(&mut ramp, 1000, 0, 100);
    let back = drive(&mut ramp, 0, out.end, 100);

    assert_eq!(ramp.current_position(), 0);
    assert_eq!(out.intervals, back.intervals);
    assert!(out.speeds.iter().zip(&back.speeds).all(|(a, b)| *a == -*b));
    assert_eq!(out.end, back.end - out.end);
}

#[test]
fn test_acceleration_is_bounded() {
    let acceleration = 5000.0;
    let mut ramp = AccelRamp::new(1000.0, acceleration).unwrap();
    ramp.move_to(1000);

    let mut now = 0;
    let mut previous = ramp.speed();
    while ramp.is_running() {
        let dt = ramp.step_interval();
        now += dt;
        assert!(ramp.run(now).is_some());

        // The last step drops straight to zero
        if ramp.speed() != 0.0 {
            let dt = dt as f64 / TICKS_PER_SECOND as f64;
            let dv = (ramp.speed() - previous).abs();
            assert!(dv <= 2.0 * acceleration * dt, "dv {dv} over {dt}s");
        }
        previous = ramp.speed();
    }
    assert_eq!(ramp.current_position(), 1000);
}

#[test]
fn test_raise_max_speed_mid_ramp() {
    let mut ramp = ramp();
    ramp.move_to(1000);
    let mut now = 0;
    while ramp.current_position() < 50 {
        now += 100;
        ramp.run(now);
    }

    let before = ramp.speed();
    ramp.set_max_speed(2000.0).unwrap();
    assert_eq!(ramp.current_position(), 50);
    assert!((ramp.speed() - before).abs() < 0.05 * before);

    let trace = drive(&mut ramp, 1000, now, 100);
    assert!(trace.speeds.iter().all(|s| *s <= 2000.0));
    assert_eq!(ramp.current_position(), 1000);
}

#[test]
fn test_lower_acceleration_mid_ramp() {
    let mut ramp = ramp();
    ramp.move_to(1000);
    let mut now = 0;
    while ramp.current_position() < 30 {
        now += 100;
        ramp.run(now);
    }

    let before = ramp.speed();
    let step = ramp.ramp_step();
    ramp.set_acceleration(2500.0).unwrap();

    assert_eq!(ramp.current_position(), 30);
    assert!((ramp.speed() - before).abs() < 0.05 * before);
    // Same speed at half the acceleration is twice as far up the ramp
    assert!(ramp.ramp_step() > step);

    drive(&mut ramp, 1000, now, 100);
    assert_eq!(ramp.current_position(), 1000);
}

#[test]
fn test_stop_from_cruise() {
    let mut ramp = ramp();
    ramp.move_to(1000);
    let mut now = 0;
    while ramp.current_position() < 300 {
        now += 100;
        ramp.run(now);
    }
    assert_eq!(ramp.speed(), 1000.0);
    assert_eq!(ramp.step_interval(), 10_000);

    ramp.stop();
    // v²/2a = 100 steps to stop, plus one
    assert_eq!(ramp.target_position(), 401);

    // Repeated stops while braking do not push the target further
    ramp.stop();
    assert!(ramp.target_position() <= 401);

    let target = ramp.target_position();
    let trace = drive(&mut ramp, target, now, 100);
    assert!(trace.speeds.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(ramp.speed(), 0.0);
    assert!(ramp.current_position() <= 401);
}

#[test]
fn test_reverse_while_moving() {
    let mut ramp = ramp();
    ramp.move_to(1000);
    let mut now = 0;
    while ramp.current_position() < 300 {
        now += 100;
        ramp.run(now);
    }

    let trace = drive(&mut ramp, 0, now, 100);
    assert_eq!(ramp.current_position(), 0);
    assert_eq!(ramp.speed(), 0.0);

    // Brakes forward first, then runs back
    assert!(trace.speeds.first().is_some_and(|s| *s > 0.0));
    assert!(trace.speeds.iter().any(|s| *s < 0.0));
}
