//! Single LED on a GPIO.

use embedded_hal::digital::OutputPin;

use crate::utils::controllers::Light;

pub struct Led<P> {
    pin: P,
    active_low: bool,
}

impl<P: OutputPin> Led<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// LED wired between the supply and the pin.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }
}

impl<P: OutputPin> Light for Led<P> {
    type Error = P::Error;

    fn on(&mut self) -> Result<(), P::Error> {
        self.pin.set_state((!self.active_low).into())
    }

    fn off(&mut self) -> Result<(), P::Error> {
        self.pin.set_state(self.active_low.into())
    }
}
