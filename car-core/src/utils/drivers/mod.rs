//! Reference drivers for the parts of a hobby car.
//!
//! - `l298n`: dual H-bridge driving the two wheel pairs (`Engine`)
//! - `servo`: SG90 steering servo on a PCA9685 PWM expander (`Steering`)
//! - `buzzer`: active buzzer on a GPIO (`Horn`)
//! - `led`: single LED on a GPIO (`Light`)
//! - `strip`: addressable LED strip (`Light`)

pub mod buzzer;
pub mod l298n;
pub mod led;
pub mod servo;
pub mod strip;

pub use buzzer::Buzzer;
pub use l298n::L298n;
pub use led::Led;
pub use servo::{DeviceError, Sg90};
pub use strip::LedStrip;
