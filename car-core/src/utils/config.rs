//! Timing and steering geometry for the car.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

/// Tunable constants used by the dispatcher.
///
/// The defaults match the stock car: a 70 ms turn impulse, five horn pulses
/// 100 ms apart, a 1 s blink phase and 15° steering steps within ±90°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarConfig {
    /// How long `left`/`right` drive the engine before it is stopped again.
    pub turn_settle_ms: u64,
    /// Number of whistles in one honk.
    pub honk_pulses: u8,
    /// Pause between two whistles.
    pub honk_interval_ms: u64,
    /// Duration of each on and each off phase of the blinker.
    pub blink_period_ms: u64,
    /// Degrees added or removed by one steering command.
    pub steer_step: i32,
    /// Absolute bound of the steering angle in degrees, capped at 90.
    pub steer_limit: i32,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            turn_settle_ms: 70,
            honk_pulses: 5,
            honk_interval_ms: 100,
            blink_period_ms: 1000,
            steer_step: 15,
            steer_limit: 90,
        }
    }
}

impl CarConfig {
    pub fn turn_settle(&self) -> Duration {
        Duration::from_millis(self.turn_settle_ms)
    }

    pub fn honk_interval(&self) -> Duration {
        Duration::from_millis(self.honk_interval_ms)
    }

    pub fn blink_period(&self) -> Duration {
        Duration::from_millis(self.blink_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_car() {
        let c = CarConfig::default();
        assert_eq!(c.turn_settle(), Duration::from_millis(70));
        assert_eq!(c.honk_pulses, 5);
        assert_eq!(c.honk_interval(), Duration::from_millis(100));
        assert_eq!(c.blink_period(), Duration::from_secs(1));
        assert_eq!((c.steer_step, c.steer_limit), (15, 90));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: CarConfig = serde_json::from_str(r#"{"blink_period_ms":250}"#).unwrap();
        assert_eq!(c.blink_period_ms, 250);
        assert_eq!(c.honk_pulses, 5);
    }
}
