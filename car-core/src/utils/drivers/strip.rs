//! Addressable LED strip used as the indicator light.
//!
//! Drives every LED of an `N`-long chain through `SmartLedsWrite`.

use smart_leds_trait::{SmartLedsWrite, RGB8};

/// Amber, the usual indicator color.
pub const AMBER: RGB8 = RGB8 {
    r: 255,
    g: 140,
    b: 0,
};

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Light built from a chain of `N` addressable LEDs.
///
/// Keeps the on/off state and the color used when switched on.
pub struct LedStrip<Driver, const N: usize> {
    driver: Driver,
    is_on: bool,
    color: RGB8,
}

impl<Driver, E, const N: usize> LedStrip<Driver, N>
where
    Driver: SmartLedsWrite<Color = RGB8, Error = E>,
{
    /// Create a strip over the given LED driver. It starts off, colored amber.
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            is_on: false,
            color: AMBER,
        }
    }

    /// Change the color, applied immediately if the strip is on.
    pub fn set_color(
        &mut self,
        color: RGB8,
    ) -> Result<(), E> {
        self.color = color;
        if self.is_on {
            self.set_all(color)?;
        }
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Give back the LED driver.
    pub fn release(self) -> Driver {
        self.driver
    }

    /// Set all LEDs in the strip to the specified color.
    fn set_all(
        &mut self,
        color: RGB8,
    ) -> Result<(), E> {
        let data = core::iter::repeat(color).take(N);
        self.driver.write(data)
    }
}

impl<Driver, E, const N: usize> crate::utils::controllers::Light for LedStrip<Driver, N>
where
    Driver: SmartLedsWrite<Color = RGB8, Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn on(&mut self) -> Result<(), E> {
        self.is_on = true;
        self.set_all(self.color)
    }

    fn off(&mut self) -> Result<(), E> {
        self.is_on = false;
        self.set_all(BLACK)
    }
}
