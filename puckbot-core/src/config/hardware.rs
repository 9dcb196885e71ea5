//! Hardware configuration types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }

    /// Electrical level for a logical state
    pub const fn level(&self, active: bool) -> bool {
        active != self.inverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_level() {
        let normal = PinConfig::new(18);
        assert!(normal.level(true));
        assert!(!normal.level(false));

        let inverted = PinConfig::inverted(23);
        assert!(!inverted.level(true));
        assert!(inverted.level(false));
    }
}
