//! Error types

use core::fmt;

use crate::motion::Axis;

/// Rejected motion parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Max speed must be finite and greater than zero
    InvalidMaxSpeed,
    /// Acceleration must be finite and greater than zero
    InvalidAcceleration,
    /// Constant speed must be finite
    InvalidSpeed,
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaxSpeed => f.write_str("max speed must be finite and > 0"),
            Self::InvalidAcceleration => f.write_str("acceleration must be finite and > 0"),
            Self::InvalidSpeed => f.write_str("speed must be finite"),
        }
    }
}

/// Configuration loading/validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Input is not valid configuration TOML
    Parse,
    /// Axis max speed is not a positive finite number
    InvalidMaxSpeed(Axis),
    /// Axis acceleration is not a positive finite number
    InvalidAcceleration(Axis),
}

impl ConfigError {
    /// Attach an axis to a motion parameter error
    pub fn for_axis(axis: Axis, error: MotionError) -> Self {
        match error {
            MotionError::InvalidAcceleration => Self::InvalidAcceleration(axis),
            MotionError::InvalidMaxSpeed | MotionError::InvalidSpeed => Self::InvalidMaxSpeed(axis),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => f.write_str("invalid configuration TOML"),
            Self::InvalidMaxSpeed(axis) => write!(f, "{axis:?} axis: max speed must be finite and > 0"),
            Self::InvalidAcceleration(axis) => {
                write!(f, "{axis:?} axis: acceleration must be finite and > 0")
            }
        }
    }
}
