//! SG90 steering servo on a PCA9685 PWM expander.
//!
//! The expander sits on a shared I2C bus, so the servo borrows the bus through
//! an `embedded-hal-bus` `RefCellDevice`. At 50 Hz one PWM period is 20 ms
//! (4096 counts); the SG90 maps 0.5 ms..2.5 ms onto -90°..90°.

use core::cell::RefCell;

use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use pwm_pca9685::{Address as PwmAddress, Channel, Error as PwmError, Pca9685};

use crate::utils::controllers::Steering;

/// Default I2C address of the PWM expander.
pub const PWM_ADDRESS: u8 = 0x40;
/// Prescale for a 50 Hz PWM frequency from the 25 MHz internal clock.
pub const PRESCALE_50HZ: u8 = 121;

/// Counts for a 1.5 ms pulse (wheels centered).
const CENTER_COUNTS: i32 = 307;
/// Counts between center and either end stop.
const SWING_COUNTS: i32 = 205;
const MAX_ANGLE: i32 = 90;

/// Errors that can occur when driving the servo.
#[derive(Debug)]
pub enum DeviceError<E: core::fmt::Debug> {
    PwmError(PwmError<E>),
}

pub struct Sg90<'a, I2C: 'static> {
    pwm: Pca9685<RefCellDevice<'a, I2C>>,
    channel: Channel,
}

impl<'a, I2C, E> Sg90<'a, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    /// Create a servo on `channel` of the expander at `address`.
    ///
    /// No bus traffic happens until [`configure`](Self::configure) or the
    /// first [`roll`](Steering::roll).
    pub fn new(
        i2c_bus: &'a RefCell<I2C>,
        address: u8,
        channel: Channel,
    ) -> Result<Self, DeviceError<E>> {
        let pwm = Pca9685::new(RefCellDevice::new(i2c_bus), PwmAddress::from(address))
            .map_err(DeviceError::PwmError)?;
        Ok(Sg90 { pwm, channel })
    }

    /// Wake the expander and set its frequency to 50 Hz.
    pub fn configure(&mut self) -> Result<(), DeviceError<E>> {
        self.pwm.enable().map_err(DeviceError::PwmError)?;
        tracing::info!("PWM enabled");
        self.pwm
            .set_prescale(PRESCALE_50HZ)
            .map_err(DeviceError::PwmError)?;
        tracing::info!("PWM prescale set to 50Hz");
        Ok(())
    }

    /// PWM off-count for `angle` degrees, clamped to the servo's travel.
    pub fn counts_for(angle: i32) -> u16 {
        let angle = angle.clamp(-MAX_ANGLE, MAX_ANGLE);
        (CENTER_COUNTS + angle * SWING_COUNTS / MAX_ANGLE) as u16
    }
}

impl<I2C, E> Steering for Sg90<'_, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    type Error = DeviceError<E>;

    fn roll(
        &mut self,
        angle: i32,
    ) -> Result<(), DeviceError<E>> {
        let counts = Self::counts_for(angle);
        tracing::debug!(angle, counts, "servo roll");
        self.pwm
            .set_channel_on_off(self.channel, 0, counts)
            .map_err(DeviceError::PwmError)
    }
}
