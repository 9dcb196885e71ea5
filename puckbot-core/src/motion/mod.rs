//! Motion control
//!
//! Per-axis acceleration ramps, the lock-guarded controller that drives
//! them from a polling loop, and the two-axis gantry.

pub mod axis;
pub mod gantry;
pub mod position;
pub mod ramp;

pub use axis::AxisMotionController;
pub use gantry::Gantry;
pub use position::{Axis, AxisStatus, TargetCommand};
pub use ramp::AccelRamp;
