//! Axis identifiers and position telemetry
//!
//! These types define the command/status interface between the decision
//! layer and the axis controllers of the mallet gantry.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// X axis (across the table)
    X,
    /// Y axis (toward the opponent goal)
    Y,
}

impl Axis {
    /// Lower-case name, as used for config tables
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// Command to move an axis to an absolute position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TargetCommand {
    /// Target axis
    pub axis: Axis,
    /// Target position in steps
    pub position: i64,
}

impl TargetCommand {
    /// Create an X axis target command
    pub fn x(position: i64) -> Self {
        Self {
            axis: Axis::X,
            position,
        }
    }

    /// Create a Y axis target command
    pub fn y(position: i64) -> Self {
        Self {
            axis: Axis::Y,
            position,
        }
    }
}

/// Snapshot of one axis, taken under a single lock
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisStatus {
    /// Current position in steps
    pub position: i64,
    /// Target position in steps
    pub target: i64,
    /// Signed speed in steps/s
    pub speed: f64,
    /// Pending step interval in ticks (0 = stopped)
    pub step_interval: u64,
}

impl AxisStatus {
    /// Steps remaining to the target
    pub fn distance_to_go(&self) -> i64 {
        self.target - self.position
    }

    /// At the target with no residual speed
    pub fn is_settled(&self) -> bool {
        self.distance_to_go() == 0 && self.speed == 0.0
    }
}
