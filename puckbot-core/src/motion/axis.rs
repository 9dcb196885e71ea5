//! Lock-guarded stepper axis controller
//!
//! One [`AxisMotionController`] owns one axis: its [`AccelRamp`], its
//! step/direction output and a reference to the clock. A polling loop
//! calls [`run`](AxisMotionController::run) as often as it can; the
//! controller decides on each call whether a step is due.
//!
//! All methods take `&self`. State lives behind an
//! `embassy_sync` blocking mutex, so a decision thread can retarget or
//! retune the axis while the polling thread is stepping it without either
//! seeing a half-applied change. Pick the raw mutex for the setting:
//!
//! - `CriticalSectionRawMutex` when shared across threads or interrupts
//! - `NoopRawMutex` when a single thread does everything
//!
//! # Usage
//!
//! ```ignore
//! let axis = AxisMotionController::<CriticalSectionRawMutex, _, _>::new(
//!     &config.x, pins, &clock,
//! )?;
//! axis.move_to(1200);
//!
//! // Polling loop, never sleeps
//! while axis.run() {}
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

use super::position::AxisStatus;
use super::ramp::AccelRamp;
use crate::config::{AxisConfig, MAX_LABEL_LEN};
use crate::error::MotionError;
use crate::traits::{Direction, StepOutput, TickClock};

/// Everything that changes while the axis runs
struct AxisState<O> {
    ramp: AccelRamp,
    output: O,
    /// Skip pin writes
    debug: bool,
    /// Level last written to the direction pin
    written_direction: Option<Direction>,
    /// Failed step/direction writes
    output_faults: u32,
}

impl<O: StepOutput> AxisState<O> {
    /// Drive the pins for one step
    ///
    /// Returns false if a write failed. The step has already been counted
    /// by the ramp either way.
    fn emit(&mut self, direction: Direction) -> bool {
        if self.debug {
            return true;
        }

        let mut ok = true;
        if self.written_direction != Some(direction) {
            if self.output.set_direction(direction).is_ok() {
                self.written_direction = Some(direction);
            } else {
                ok = false;
            }
        }
        if self.output.step().is_err() {
            ok = false;
        }

        if !ok {
            self.output_faults = self.output_faults.saturating_add(1);
        }
        ok
    }
}

/// Stepper axis with acceleration-limited moves
///
/// Generic over the raw mutex `M`, the output sink `O` and the clock `C`.
pub struct AxisMotionController<M: RawMutex, O, C> {
    name: String<MAX_LABEL_LEN>,
    clock: C,
    state: Mutex<M, RefCell<AxisState<O>>>,
}

impl<M: RawMutex, O: StepOutput, C: TickClock> AxisMotionController<M, O, C> {
    /// Create a stopped axis at position 0
    pub fn new(config: &AxisConfig, output: O, clock: C) -> Result<Self, MotionError> {
        config.validate()?;
        let ramp = AccelRamp::new(config.max_speed, config.acceleration)?;

        Ok(Self {
            name: config.name.clone(),
            clock,
            state: Mutex::new(RefCell::new(AxisState {
                ramp,
                output,
                debug: config.debug,
                written_direction: None,
                output_faults: 0,
            })),
        })
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut AxisState<O>) -> R) -> R {
        self.state.lock(|state| f(&mut state.borrow_mut()))
    }

    fn with_ramp<R>(&self, f: impl FnOnce(&mut AccelRamp) -> R) -> R {
        self.with_state(|state| f(&mut state.ramp))
    }

    /// Axis label from the config
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    // --- configuration ---

    /// Set the speed limit in steps/s
    ///
    /// Takes effect mid-move without a jump in position.
    pub fn set_max_speed(&self, speed: f64) -> Result<(), MotionError> {
        self.with_ramp(|ramp| ramp.set_max_speed(speed))
    }

    /// Set the acceleration in steps/s²
    ///
    /// Exactly `0.0` is ignored (and logged); other non-positive or
    /// non-finite values are rejected.
    pub fn set_acceleration(&self, acceleration: f64) -> Result<(), MotionError> {
        if acceleration == 0.0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} axis: ignoring zero acceleration", self.name.as_str());
        }
        self.with_ramp(|ramp| ramp.set_acceleration(acceleration))
    }

    /// Redefine the current position, e.g. after hitting a limit switch
    ///
    /// Drops any move in progress; call only when the axis is quiescent.
    pub fn set_current_position(&self, position: i64) {
        self.with_ramp(|ramp| ramp.set_current_position(position));
    }

    /// Suppress pin writes while still running the full profile
    pub fn set_debug(&self, debug: bool) {
        self.with_state(|state| state.debug = debug);
    }

    /// True if pin writes are suppressed
    pub fn is_debug(&self) -> bool {
        self.with_state(|state| state.debug)
    }

    /// Constant-speed mode in steps/s (see [`AccelRamp::set_speed`])
    pub fn set_speed(&self, speed: f64) -> Result<(), MotionError> {
        self.with_ramp(|ramp| ramp.set_speed(speed))
    }

    // --- motion requests ---

    /// Set an absolute target in steps
    pub fn move_to(&self, absolute: i64) {
        self.with_ramp(|ramp| ramp.move_to(absolute));
    }

    /// Set a target relative to the current position
    pub fn move_by(&self, relative: i64) {
        self.with_ramp(|ramp| ramp.move_by(relative));
    }

    /// Brake to a halt at the configured acceleration
    ///
    /// The axis keeps stepping while it slows down; keep calling
    /// [`run`](Self::run).
    pub fn stop(&self) {
        self.with_ramp(|ramp| ramp.stop());
    }

    // --- stepping ---

    /// Poll the axis: step if due and plan the next step
    ///
    /// Returns true while the axis is moving or short of its target.
    pub fn run(&self) -> bool {
        self.with_state(|state| {
            let now = self.clock.now_ticks();
            if let Some(direction) = state.ramp.run_speed(now) {
                if !state.emit(direction) {
                    self.output_fault();
                }
                state.ramp.compute_new_speed();
            }
            state.ramp.is_running()
        })
    }

    /// Step if due, without updating the speed
    ///
    /// Returns true if a step was taken.
    pub fn run_speed(&self) -> bool {
        self.with_state(|state| {
            let now = self.clock.now_ticks();
            match state.ramp.run_speed(now) {
                Some(direction) => {
                    if !state.emit(direction) {
                        self.output_fault();
                    }
                    true
                }
                None => false,
            }
        })
    }

    /// Step at the constant speed set by [`set_speed`](Self::set_speed)
    /// until the target is reached
    ///
    /// Returns true if a step was taken.
    pub fn run_speed_to_position(&self) -> bool {
        self.with_state(|state| {
            let now = self.clock.now_ticks();
            match state.ramp.run_speed_to_position(now) {
                Some(direction) => {
                    if !state.emit(direction) {
                        self.output_fault();
                    }
                    true
                }
                None => false,
            }
        })
    }

    /// Busy-poll until the axis settles
    ///
    /// Blocks the caller. Meant for homing and other synchronous moves,
    /// not for the main control loop.
    pub fn run_to_position(&self) {
        while self.run() {}
    }

    /// Set an absolute target and busy-poll until it is reached
    pub fn run_to_new_position(&self, position: i64) {
        self.move_to(position);
        self.run_to_position();
    }

    fn output_fault(&self) {
        #[cfg(feature = "defmt")]
        defmt::warn!("{} axis: step output write failed", self.name.as_str());
    }

    // --- queries ---

    /// Current position in steps
    pub fn current_position(&self) -> i64 {
        self.with_ramp(|ramp| ramp.current_position())
    }

    /// Most recent target in steps
    pub fn target_position(&self) -> i64 {
        self.with_ramp(|ramp| ramp.target_position())
    }

    /// Signed steps remaining to the target
    pub fn distance_to_go(&self) -> i64 {
        self.with_ramp(|ramp| ramp.distance_to_go())
    }

    /// Signed speed in steps/s
    pub fn speed(&self) -> f64 {
        self.with_ramp(|ramp| ramp.speed())
    }

    /// Speed limit in steps/s
    pub fn max_speed(&self) -> f64 {
        self.with_ramp(|ramp| ramp.max_speed())
    }

    /// Acceleration in steps/s²
    pub fn acceleration(&self) -> f64 {
        self.with_ramp(|ramp| ramp.acceleration())
    }

    /// Pending step interval in ticks (0 when stopped)
    pub fn step_interval(&self) -> u64 {
        self.with_ramp(|ramp| ramp.step_interval())
    }

    /// True while moving or short of the target
    pub fn is_running(&self) -> bool {
        self.with_ramp(|ramp| ramp.is_running())
    }

    /// Position, target, speed and interval from one lock
    pub fn status(&self) -> AxisStatus {
        self.with_ramp(|ramp| AxisStatus {
            position: ramp.current_position(),
            target: ramp.target_position(),
            speed: ramp.speed(),
            step_interval: ramp.step_interval(),
        })
    }

    /// Number of steps whose pin writes failed
    pub fn output_faults(&self) -> u32 {
        self.with_state(|state| state.output_faults)
    }

    /// Borrow the output sink under the lock
    pub fn with_output<R>(&self, f: impl FnOnce(&mut O) -> R) -> R {
        self.with_state(|state| f(&mut state.output))
    }

    /// Release the output sink
    pub fn into_output(self) -> O {
        self.state.into_inner().into_inner().output
    }
}
