//! Active buzzer on a GPIO.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::utils::controllers::Horn;

/// Length of one whistle unless configured otherwise.
pub const DEFAULT_PULSE_MS: u32 = 40;

pub struct Buzzer<P, D> {
    pin: P,
    delay: D,
    pulse_ms: u32,
}

impl<P, D> Buzzer<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(
        pin: P,
        delay: D,
    ) -> Self {
        Self {
            pin,
            delay,
            pulse_ms: DEFAULT_PULSE_MS,
        }
    }

    pub fn with_pulse_ms(
        mut self,
        pulse_ms: u32,
    ) -> Self {
        self.pulse_ms = pulse_ms;
        self
    }
}

impl<P, D> Horn for Buzzer<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    type Error = P::Error;

    /// Sound the buzzer for one pulse. Blocks for the pulse length.
    fn whistle(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        self.delay.delay_ms(self.pulse_ms);
        self.pin.set_low()
    }
}
