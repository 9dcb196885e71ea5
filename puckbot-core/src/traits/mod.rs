//! Hardware abstraction traits
//!
//! These traits define the interface between the motion logic
//! and hardware-specific implementations.

pub mod clock;
pub mod stepper;

pub use clock::{ManualClock, TickClock, TICKS_PER_SECOND};
pub use stepper::{Direction, NullOutput, StepOutput};
