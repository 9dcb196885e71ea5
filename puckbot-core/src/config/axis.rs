//! Axis and gantry configuration
//!
//! Speeds are in steps/s and accelerations in steps/s². Converting table
//! coordinates to steps happens upstream.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::PinConfig;
use crate::error::{ConfigError, MotionError};
use crate::motion::Axis;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Default X axis speed limit (steps/s)
pub const DEFAULT_X_MAX_SPEED: f64 = 100_000.0;

/// Default Y axis speed limit (steps/s)
pub const DEFAULT_Y_MAX_SPEED: f64 = 30_000.0;

/// Default acceleration (steps/s²)
pub const DEFAULT_ACCELERATION: f64 = 50_000.0;

/// Configuration for one stepper axis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisConfig {
    /// Axis label used in logs (e.g., "x", "y")
    pub name: String<MAX_LABEL_LEN>,
    /// Speed limit in steps/s
    pub max_speed: f64,
    /// Acceleration and deceleration in steps/s²
    pub acceleration: f64,
    /// Step pulse pin
    pub step_pin: PinConfig,
    /// Direction pin (active = positive direction)
    pub dir_pin: PinConfig,
    /// Minimum step pulse width in µs (0 = as short as the pin allows)
    pub min_pulse_width_us: u32,
    /// Run the profile without writing to the pins
    pub debug: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_speed: DEFAULT_Y_MAX_SPEED,
            acceleration: DEFAULT_ACCELERATION,
            step_pin: PinConfig::default(),
            dir_pin: PinConfig::default(),
            min_pulse_width_us: 1,
            debug: false,
        }
    }
}

impl AxisConfig {
    /// Config with the given limits and default pins
    pub fn new(max_speed: f64, acceleration: f64) -> Self {
        Self {
            max_speed,
            acceleration,
            ..Default::default()
        }
    }

    /// Check the motion limits
    pub fn validate(&self) -> Result<(), MotionError> {
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(MotionError::InvalidMaxSpeed);
        }
        if !(self.acceleration.is_finite() && self.acceleration > 0.0) {
            return Err(MotionError::InvalidAcceleration);
        }
        Ok(())
    }
}

/// Configuration for the two-axis mallet gantry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GantryConfig {
    /// X axis (across the table)
    pub x: AxisConfig,
    /// Y axis (toward the opponent goal)
    pub y: AxisConfig,
}

impl Default for GantryConfig {
    fn default() -> Self {
        Self {
            x: AxisConfig {
                name: label(Axis::X),
                max_speed: DEFAULT_X_MAX_SPEED,
                ..Default::default()
            },
            y: AxisConfig {
                name: label(Axis::Y),
                max_speed: DEFAULT_Y_MAX_SPEED,
                ..Default::default()
            },
        }
    }
}

impl GantryConfig {
    /// Config for one axis
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Check both axes
    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in [Axis::X, Axis::Y] {
            self.axis(axis)
                .validate()
                .map_err(|e| ConfigError::for_axis(axis, e))?;
        }
        Ok(())
    }

    /// Give unnamed axes their table name
    pub fn fill_names(&mut self) {
        if self.x.name.is_empty() {
            self.x.name = label(Axis::X);
        }
        if self.y.name.is_empty() {
            self.y.name = label(Axis::Y);
        }
    }

    /// Parse and validate a TOML document with `[x]` and `[y]` tables
    ///
    /// Missing keys take their defaults.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let mut config: GantryConfig = toml::from_str(input).map_err(|_| ConfigError::Parse)?;
        config.fill_names();
        config.validate()?;
        Ok(config)
    }
}

fn label(axis: Axis) -> String<MAX_LABEL_LEN> {
    let mut name = String::new();
    // Axis labels are a single character
    let _ = name.push_str(axis.label());
    name
}
