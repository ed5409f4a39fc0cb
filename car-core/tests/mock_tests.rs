use core::cell::RefCell;
use std::convert::Infallible;

use car_core::utils::controllers::{Engine, Horn, Light, Steering};
use car_core::utils::drivers::servo::{PRESCALE_50HZ, PWM_ADDRESS};
use car_core::utils::drivers::{Buzzer, L298n, Led, LedStrip, Sg90};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTrans,
};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use pwm_pca9685::Channel;
use smart_leds_trait::{SmartLedsWrite, RGB8};

/// Create a write transaction for the given I2C address and data payload.
pub fn write(
    addr: u8,
    data: Vec<u8>,
) -> I2cTrans {
    I2cTrans::write(addr, data)
}

fn pin(states: &[PinState]) -> PinMock {
    let expectations: Vec<PinTrans> = states.iter().map(|s| PinTrans::set(*s)).collect();
    PinMock::new(&expectations)
}

#[test]
fn test_l298n_forward_then_stop() {
    use PinState::{High, Low};

    let mut in1 = pin(&[High, Low]);
    let mut in2 = pin(&[Low, Low]);
    let mut in3 = pin(&[High, Low]);
    let mut in4 = pin(&[Low, Low]);

    let mut engine = L298n::new(in1.clone(), in2.clone(), in3.clone(), in4.clone());
    engine.forward().unwrap();
    engine.stop().unwrap();

    in1.done();
    in2.done();
    in3.done();
    in4.done();
}

#[test]
fn test_l298n_turns_spin_wheel_pairs_apart() {
    use PinState::{High, Low};

    // left, right, backward
    let mut in1 = pin(&[Low, High, Low]);
    let mut in2 = pin(&[High, Low, High]);
    let mut in3 = pin(&[High, Low, Low]);
    let mut in4 = pin(&[Low, High, High]);

    let mut engine = L298n::new(in1.clone(), in2.clone(), in3.clone(), in4.clone());
    engine.left().unwrap();
    engine.right().unwrap();
    engine.backward().unwrap();

    in1.done();
    in2.done();
    in3.done();
    in4.done();
}

#[test]
fn test_configure_servo_pwm() {
    // Enable, then prescale (sleep, prescale, wake), then the first roll
    // switches on register auto-increment.
    let expectations = [
        write(PWM_ADDRESS, vec![0x00, 0x01]),
        write(PWM_ADDRESS, vec![0x00, 0x11]),
        write(PWM_ADDRESS, vec![0xFE, PRESCALE_50HZ]),
        write(PWM_ADDRESS, vec![0x00, 0x01]),
        write(PWM_ADDRESS, vec![0x00, 0x21]),
        write(PWM_ADDRESS, vec![0x06, 0x00, 0x00, 0x00, 0x02]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut servo = Sg90::new(&i2c_bus, PWM_ADDRESS, Channel::C0).unwrap();
    servo.configure().unwrap();
    servo.roll(90).unwrap();
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_servo_roll_writes_pulse_counts() {
    let expectations = [
        write(PWM_ADDRESS, vec![0x00, 0x31]),
        // 0° -> 307 counts
        write(PWM_ADDRESS, vec![0x06, 0x00, 0x00, 0x33, 0x01]),
        // -90° -> 102 counts
        write(PWM_ADDRESS, vec![0x06, 0x00, 0x00, 0x66, 0x00]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut servo = Sg90::new(&i2c_bus, PWM_ADDRESS, Channel::C0).unwrap();
    servo.roll(0).unwrap();
    servo.roll(-90).unwrap();
    i2c_bus.borrow_mut().done();
}

#[test]
fn servo_counts_clamp_to_travel() {
    type Servo<'a> = Sg90<'a, I2cMock>;

    assert_eq!(Servo::counts_for(0), 307);
    assert_eq!(Servo::counts_for(90), 512);
    assert_eq!(Servo::counts_for(-45), 205);
    assert_eq!(Servo::counts_for(180), Servo::counts_for(90));
    assert_eq!(Servo::counts_for(-180), Servo::counts_for(-90));
}

#[test]
fn test_buzzer_whistle_pulses_pin() {
    let mut buzzer_pin = pin(&[PinState::High, PinState::Low]);
    let mut buzzer = Buzzer::new(buzzer_pin.clone(), NoopDelay::new());
    buzzer.whistle().unwrap();
    buzzer_pin.done();
}

#[test]
fn test_led_on_off() {
    let mut led_pin = pin(&[PinState::High, PinState::Low]);
    let mut led = Led::new(led_pin.clone());
    led.on().unwrap();
    led.off().unwrap();
    led_pin.done();
}

#[test]
fn test_active_low_led_inverts() {
    let mut led_pin = pin(&[PinState::Low, PinState::High]);
    let mut led = Led::active_low(led_pin.clone());
    led.on().unwrap();
    led.off().unwrap();
    led_pin.done();
}

/// LED driver that keeps every frame it was asked to show.
#[derive(Default)]
struct FrameRecorder {
    frames: Vec<Vec<RGB8>>,
}

impl SmartLedsWrite for FrameRecorder {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(
        &mut self,
        iterator: T,
    ) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.frames
            .push(iterator.into_iter().map(Into::into).collect());
        Ok(())
    }
}

#[test]
fn led_strip_blinks_whole_chain() {
    let black = RGB8 { r: 0, g: 0, b: 0 };
    let red = RGB8 { r: 255, g: 0, b: 0 };

    let mut strip: LedStrip<FrameRecorder, 3> = LedStrip::new(FrameRecorder::default());
    strip.set_color(red).unwrap();
    assert!(!strip.is_on());
    strip.on().unwrap();
    assert!(strip.is_on());
    strip.off().unwrap();

    let driver = strip.release();
    assert_eq!(driver.frames, vec![vec![red; 3], vec![black; 3]]);
}
