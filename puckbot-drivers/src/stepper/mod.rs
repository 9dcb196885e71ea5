//! Stepper output drivers

pub mod step_dir;

pub use step_dir::{NoDelay, PinError, StepDirPins};
