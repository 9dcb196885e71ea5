//! Step/direction stepper output
//!
//! Drives a stepper driver (A4988, DRV8825, TMC in standalone mode, ...)
//! through two GPIO pins: one pulse on STEP per step, DIR level selects
//! the direction. Each pin can be inverted for drivers or level shifters
//! with active-low inputs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use puckbot_core::config::{AxisConfig, PinConfig};
use puckbot_core::traits::{Direction, StepOutput};

/// Which pin failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError<S, D> {
    /// Writing the step pin failed
    Step(S),
    /// Writing the direction pin failed
    Direction(D),
}

/// Delay that returns immediately
///
/// For drivers that latch a step on the shortest pulse the pin can produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Stepper output over a STEP and a DIR pin
pub struct StepDirPins<STEP, DIR, D = NoDelay> {
    step: STEP,
    dir: DIR,
    delay: D,
    step_pin: PinConfig,
    dir_pin: PinConfig,
    /// Minimum time STEP is held active (µs)
    pulse_width_us: u32,
}

impl<STEP, DIR, D> StepDirPins<STEP, DIR, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    D: DelayNs,
{
    /// Take the pins and park STEP in its inactive state
    ///
    /// Pin numbers in `config` are informational; inversion and pulse
    /// width are applied.
    pub fn new(
        step: STEP,
        dir: DIR,
        delay: D,
        config: &AxisConfig,
    ) -> Result<Self, PinError<STEP::Error, DIR::Error>> {
        let mut pins = Self {
            step,
            dir,
            delay,
            step_pin: config.step_pin,
            dir_pin: config.dir_pin,
            pulse_width_us: config.min_pulse_width_us,
        };
        pins.write_step(false)?;
        Ok(pins)
    }

    /// Give back the pins and delay
    pub fn release(self) -> (STEP, DIR, D) {
        (self.step, self.dir, self.delay)
    }

    fn write_step(&mut self, active: bool) -> Result<(), PinError<STEP::Error, DIR::Error>> {
        self.step
            .set_state(PinState::from(self.step_pin.level(active)))
            .map_err(PinError::Step)
    }
}

impl<STEP, DIR, D> StepOutput for StepDirPins<STEP, DIR, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    D: DelayNs,
{
    type Error = PinError<STEP::Error, DIR::Error>;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        let active = direction == Direction::Positive;
        self.dir
            .set_state(PinState::from(self.dir_pin.level(active)))
            .map_err(PinError::Direction)
    }

    fn step(&mut self) -> Result<(), Self::Error> {
        self.write_step(true)?;
        if self.pulse_width_us > 0 {
            self.delay.delay_us(self.pulse_width_us);
        }
        self.write_step(false)
    }
}
