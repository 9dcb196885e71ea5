//! Discrete acceleration ramp for one stepper axis
//!
//! Step timing follows D. Austin, "Generate stepper-motor speed profiles
//! in real time" (2005). Instead of integrating velocity, each step's
//! interval is derived from the previous one:
//!
//! ```text
//! c0 = 0.676 * sqrt(2 / a)          first step of a ramp
//! cn = cn-1 - 2 * cn-1 / (4n + 1)   every step after that
//! ```
//!
//! `n` counts up from 1 while accelerating and up from `-steps_to_stop`
//! while decelerating, so the same recurrence shrinks the interval on the
//! way up and stretches it on the way down. The 0.676 factor corrects the
//! error the approximation makes on the first step.
//!
//! [`AccelRamp`] is pure state: it never reads a clock or touches a pin.
//! [`AxisMotionController`](super::AxisMotionController) wraps it with a
//! lock, a clock and an output.

use libm::{fabs, round, sqrt};

use crate::error::MotionError;
use crate::traits::clock::TICKS_PER_SECOND;
use crate::traits::stepper::Direction;

/// First-step correction factor
pub const FIRST_STEP_CORRECTION: f64 = 0.676;

const TICKS_PER_SECOND_F: f64 = TICKS_PER_SECOND as f64;

/// Interval of the first step of a ramp, in ticks
fn first_interval(acceleration: f64) -> f64 {
    FIRST_STEP_CORRECTION * sqrt(2.0 / acceleration) * TICKS_PER_SECOND_F
}

fn check_max_speed(speed: f64) -> Result<(), MotionError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidMaxSpeed)
    }
}

fn check_acceleration(acceleration: f64) -> Result<(), MotionError> {
    if acceleration.is_finite() && acceleration > 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidAcceleration)
    }
}

/// Round a fractional interval to whole ticks
///
/// Never returns 0 for a moving axis, since 0 means stopped.
fn to_ticks(interval: f64) -> u64 {
    (round(interval) as u64).max(1)
}

/// Position, speed and step-timing state of one axis
#[derive(Debug, Clone)]
pub struct AccelRamp {
    /// Absolute position in steps
    current_position: i64,
    /// Absolute target in steps
    target_position: i64,
    /// Signed speed in steps/s
    speed: f64,
    /// Speed limit in steps/s
    max_speed: f64,
    /// Acceleration in steps/s²
    acceleration: f64,
    /// Ticks from the last step to the next one, 0 when stopped
    step_interval: u64,
    /// Clock ticks of the last step
    last_step_time: u64,
    /// Ramp step counter
    n: i64,
    /// First-step interval (ticks)
    c0: f64,
    /// Last computed interval (ticks)
    cn: f64,
    /// Interval at max speed (ticks)
    cmin: f64,
    direction: Direction,
}

impl AccelRamp {
    /// Create a stopped ramp at position 0
    pub fn new(max_speed: f64, acceleration: f64) -> Result<Self, MotionError> {
        check_max_speed(max_speed)?;
        check_acceleration(acceleration)?;

        Ok(Self {
            current_position: 0,
            target_position: 0,
            speed: 0.0,
            max_speed,
            acceleration,
            step_interval: 0,
            last_step_time: 0,
            n: 0,
            c0: first_interval(acceleration),
            cn: 0.0,
            cmin: TICKS_PER_SECOND_F / max_speed,
            direction: Direction::Positive,
        })
    }

    /// Current absolute position in steps
    pub fn current_position(&self) -> i64 {
        self.current_position
    }

    /// Most recently requested target
    pub fn target_position(&self) -> i64 {
        self.target_position
    }

    /// Steps remaining to the target (signed)
    pub fn distance_to_go(&self) -> i64 {
        self.target_position - self.current_position
    }

    /// Signed speed in steps/s
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Speed limit in steps/s
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Acceleration in steps/s²
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Pending step interval in ticks (0 when stopped)
    pub fn step_interval(&self) -> u64 {
        self.step_interval
    }

    /// Direction of the current (or last) ramp
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Ramp step counter: > 0 accelerating, < 0 decelerating
    pub fn ramp_step(&self) -> i64 {
        self.n
    }

    /// True while moving or short of the target
    pub fn is_running(&self) -> bool {
        self.speed != 0.0 || self.distance_to_go() != 0
    }

    /// Change the speed limit
    ///
    /// Mid-ramp, the ramp counter is re-derived from the current speed so
    /// the profile continues from the same point.
    pub fn set_max_speed(&mut self, speed: f64) -> Result<(), MotionError> {
        check_max_speed(speed)?;

        if self.max_speed != speed {
            self.max_speed = speed;
            self.cmin = TICKS_PER_SECOND_F / speed;
            if self.n != 0 {
                self.n = self.steps_to_stop();
                self.compute_new_speed();
            }
        }
        Ok(())
    }

    /// Change the acceleration
    ///
    /// Exactly `0.0` is ignored. The ramp counter is rescaled so the
    /// current speed maps to the same point on the new ramp.
    pub fn set_acceleration(&mut self, acceleration: f64) -> Result<(), MotionError> {
        if acceleration == 0.0 {
            return Ok(());
        }
        check_acceleration(acceleration)?;

        if self.acceleration != acceleration {
            self.n = (self.n as f64 * (self.acceleration / acceleration)) as i64;
            self.c0 = first_interval(acceleration);
            self.acceleration = acceleration;
            self.compute_new_speed();
        }
        Ok(())
    }

    /// Redefine the current position (homing)
    ///
    /// Target follows, and any ramp in progress is dropped.
    pub fn set_current_position(&mut self, position: i64) {
        self.current_position = position;
        self.target_position = position;
        self.n = 0;
        self.step_interval = 0;
        self.speed = 0.0;
    }

    /// Set an absolute target
    pub fn move_to(&mut self, absolute: i64) {
        if self.target_position != absolute {
            self.target_position = absolute;
            self.compute_new_speed();
        }
    }

    /// Set a target relative to the current position
    pub fn move_by(&mut self, relative: i64) {
        self.move_to(self.current_position + relative);
    }

    /// Retarget so the axis brakes to a halt as soon as the acceleration
    /// allows
    pub fn stop(&mut self) {
        if self.speed != 0.0 {
            let steps = self.steps_to_stop() + 1;
            if self.speed > 0.0 {
                self.move_by(steps);
            } else {
                self.move_by(-steps);
            }
        }
    }

    /// Constant-speed mode
    ///
    /// Clamped to `±max_speed`. Used with
    /// [`run_speed`](Self::run_speed) or
    /// [`run_speed_to_position`](Self::run_speed_to_position), not
    /// [`run`](Self::run), which would take over with its own ramp.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), MotionError> {
        if !speed.is_finite() {
            return Err(MotionError::InvalidSpeed);
        }
        if speed == self.speed {
            return Ok(());
        }

        let speed = speed.clamp(-self.max_speed, self.max_speed);
        if speed == 0.0 {
            self.step_interval = 0;
        } else {
            self.step_interval = to_ticks(fabs(TICKS_PER_SECOND_F / speed));
            self.direction = if speed > 0.0 {
                Direction::Positive
            } else {
                Direction::Negative
            };
        }
        self.speed = speed;
        Ok(())
    }

    /// Step timing gate
    ///
    /// Takes a step if one is due at `now`, returning its direction. The
    /// due check is done modulo 2^64, so the clock may wrap.
    pub fn run_speed(&mut self, now: u64) -> Option<Direction> {
        if self.step_interval == 0 {
            return None;
        }
        if now.wrapping_sub(self.last_step_time) < self.step_interval {
            return None;
        }

        self.current_position += self.direction.sign();
        self.last_step_time = now;
        Some(self.direction)
    }

    /// Step at constant speed until the target is reached
    pub fn run_speed_to_position(&mut self, now: u64) -> Option<Direction> {
        let distance = self.distance_to_go();
        if distance == 0 {
            return None;
        }
        self.direction = Direction::toward(distance);
        self.run_speed(now)
    }

    /// Step if due, then work out the next interval
    pub fn run(&mut self, now: u64) -> Option<Direction> {
        let step = self.run_speed(now);
        if step.is_some() {
            self.compute_new_speed();
        }
        step
    }

    fn steps_to_stop(&self) -> i64 {
        ((self.speed * self.speed) / (2.0 * self.acceleration)) as i64
    }

    /// Decide accelerate/cruise/decelerate and derive the next interval
    pub(crate) fn compute_new_speed(&mut self) {
        let distance = self.distance_to_go();
        let steps_to_stop = self.steps_to_stop();

        if distance == 0 && steps_to_stop <= 1 {
            self.step_interval = 0;
            self.speed = 0.0;
            self.n = 0;
            return;
        }

        if distance > 0 {
            if self.n > 0 {
                if steps_to_stop >= distance || self.direction == Direction::Negative {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0
                && steps_to_stop < distance
                && self.direction == Direction::Positive
            {
                self.n = -self.n;
            }
        } else if distance < 0 {
            if self.n > 0 {
                if steps_to_stop >= -distance || self.direction == Direction::Positive {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0
                && steps_to_stop < -distance
                && self.direction == Direction::Negative
            {
                self.n = -self.n;
            }
        }

        if self.n == 0 {
            // First step of a fresh ramp
            self.cn = self.c0.max(self.cmin);
            self.direction = Direction::toward(distance);
        } else {
            self.cn -= (2.0 * self.cn) / ((4.0 * self.n as f64) + 1.0);
            self.cn = self.cn.max(self.cmin);
        }
        self.n += 1;

        self.step_interval = to_ticks(self.cn);
        self.speed = TICKS_PER_SECOND_F / self.cn;
        if self.direction == Direction::Negative {
            self.speed = -self.speed;
        }
    }
}
