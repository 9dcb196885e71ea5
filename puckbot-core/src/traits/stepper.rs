//! Step/direction output trait
//!
//! Abstracts over the two signals a stepper driver (A4988, DRV8825,
//! TB6600, ...) takes: a direction level and a step pulse.

/// Axis travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing step count
    Positive,
    /// Decreasing step count
    Negative,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    /// Position change for one step in this direction
    pub fn sign(self) -> i64 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    /// Direction of a signed step distance (zero counts as negative)
    pub fn toward(distance: i64) -> Self {
        if distance > 0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }
}

/// Sink for the step and direction signals of one axis
///
/// The controller calls [`set_direction`](StepOutput::set_direction) only
/// when the direction differs from the last one written, then
/// [`step`](StepOutput::step) once per step.
pub trait StepOutput {
    /// Error reported by the underlying pins
    type Error: core::fmt::Debug;

    /// Drive the direction signal
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Emit one step pulse (rising edge, then back to idle)
    fn step(&mut self) -> Result<(), Self::Error>;
}

impl<T: StepOutput + ?Sized> StepOutput for &mut T {
    type Error = T::Error;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        (**self).set_direction(direction)
    }

    fn step(&mut self) -> Result<(), Self::Error> {
        (**self).step()
    }
}

/// Output that goes nowhere
///
/// For axes simulated without hardware attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutput;

impl StepOutput for NullOutput {
    type Error = core::convert::Infallible;

    fn set_direction(&mut self, _direction: Direction) -> Result<(), Self::Error> {
        Ok(())
    }

    fn step(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Positive.opposite(), Direction::Negative);
        assert_eq!(Direction::Negative.opposite(), Direction::Positive);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Positive.sign(), 1);
        assert_eq!(Direction::Negative.sign(), -1);
    }

    #[test]
    fn test_direction_toward() {
        assert_eq!(Direction::toward(5), Direction::Positive);
        assert_eq!(Direction::toward(-5), Direction::Negative);
        assert_eq!(Direction::toward(0), Direction::Negative);
    }
}
