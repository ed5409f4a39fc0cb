//! Clamped steering-angle state.

use crate::utils::config::CarConfig;

/// Mechanical end stop of the steering, in degrees either side of center.
pub const MAX_STEER: i32 = 90;

/// Current angle of the front wheels in degrees, negative to the left.
///
/// Moves in fixed steps and saturates at `±limit`, where `limit` never exceeds
/// [`MAX_STEER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteeringAngle {
    angle: i32,
    step: i32,
    limit: i32,
}

impl SteeringAngle {
    pub fn new(
        step: i32,
        limit: i32,
    ) -> Self {
        Self {
            angle: 0,
            step: step.saturating_abs(),
            limit: limit.saturating_abs().min(MAX_STEER),
        }
    }

    pub fn from_config(config: &CarConfig) -> Self {
        Self::new(config.steer_step, config.steer_limit)
    }

    pub fn get(&self) -> i32 {
        self.angle
    }

    /// One step to the left, floored at `-limit`.
    pub fn left(&mut self) -> i32 {
        self.angle = self.angle.saturating_sub(self.step).max(-self.limit);
        self.angle
    }

    /// One step to the right, capped at `limit`.
    pub fn right(&mut self) -> i32 {
        self.angle = self.angle.saturating_add(self.step).min(self.limit);
        self.angle
    }

    pub fn reset(&mut self) -> i32 {
        self.angle = 0;
        self.angle
    }
}

impl Default for SteeringAngle {
    fn default() -> Self {
        Self::from_config(&CarConfig::default())
    }
}
