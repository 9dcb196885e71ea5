//! Board-agnostic motion control for the air hockey robot
//!
//! This crate contains all stepper axis logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (tick clock, step/direction output)
//! - Discrete acceleration ramp (step interval math)
//! - Lock-guarded axis controller driven by a polling loop
//! - Two-axis gantry wrapper for the mallet
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod motion;
pub mod traits;

pub use error::{ConfigError, MotionError};
