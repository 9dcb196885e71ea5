//! Two-axis mallet gantry
//!
//! Pairs an X and a Y [`AxisMotionController`] that share one clock. Each
//! axis runs its own independent ramp; there is no coordinated
//! (straight-line) interpolation between them.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::axis::AxisMotionController;
use super::position::{Axis, AxisStatus, TargetCommand};
use crate::config::GantryConfig;
use crate::error::ConfigError;
use crate::traits::{StepOutput, TickClock};

/// X/Y pair of stepper axes
pub struct Gantry<M: RawMutex, O, C> {
    x: AxisMotionController<M, O, C>,
    y: AxisMotionController<M, O, C>,
}

impl<M: RawMutex, O: StepOutput, C: TickClock + Clone> Gantry<M, O, C> {
    /// Build both axes from a validated config
    pub fn new(config: &GantryConfig, x_output: O, y_output: O, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let x = AxisMotionController::new(&config.x, x_output, clock.clone())
            .map_err(|e| ConfigError::for_axis(Axis::X, e))?;
        let y = AxisMotionController::new(&config.y, y_output, clock)
            .map_err(|e| ConfigError::for_axis(Axis::Y, e))?;

        Ok(Self { x, y })
    }
}

impl<M: RawMutex, O: StepOutput, C: TickClock> Gantry<M, O, C> {
    /// Pair two existing axes
    pub fn from_axes(x: AxisMotionController<M, O, C>, y: AxisMotionController<M, O, C>) -> Self {
        Self { x, y }
    }

    /// One axis by identifier
    pub fn axis(&self, axis: Axis) -> &AxisMotionController<M, O, C> {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    pub fn x(&self) -> &AxisMotionController<M, O, C> {
        &self.x
    }

    pub fn y(&self) -> &AxisMotionController<M, O, C> {
        &self.y
    }

    /// Poll both axes
    ///
    /// Returns true while either axis is still moving.
    pub fn run(&self) -> bool {
        let x = self.x.run();
        let y = self.y.run();
        x || y
    }

    /// Set absolute targets for both axes
    pub fn move_to(&self, x: i64, y: i64) {
        self.x.move_to(x);
        self.y.move_to(y);
    }

    /// Retarget the axis named in the command
    pub fn apply(&self, command: TargetCommand) {
        self.axis(command.axis).move_to(command.position);
    }

    /// Brake both axes
    pub fn stop(&self) {
        self.x.stop();
        self.y.stop();
    }

    /// Suppress pin writes on both axes
    pub fn set_debug(&self, debug: bool) {
        self.x.set_debug(debug);
        self.y.set_debug(debug);
    }

    /// Both axes at their targets
    pub fn is_settled(&self) -> bool {
        self.x.distance_to_go() == 0 && self.y.distance_to_go() == 0
    }

    /// Busy-poll both axes to new targets
    pub fn run_to_new_position(&self, x: i64, y: i64) {
        self.move_to(x, y);
        while self.run() {}
    }

    /// X and Y snapshots
    pub fn status(&self) -> (AxisStatus, AxisStatus) {
        (self.x.status(), self.y.status())
    }

    /// Split back into the two axes
    pub fn into_axes(self) -> (AxisMotionController<M, O, C>, AxisMotionController<M, O, C>) {
        (self.x, self.y)
    }
}
