//! Capability contracts and the car dispatcher.
//!
//! - `command`: the `CarOp` vocabulary and its wire format
//! - `steering`: the clamped steering-angle state machine
//! - `car`: the `Car` actor and its builder
//!
//! Each physical part of the car is reached through one small trait. A part
//! that is not fitted is expressed with [`Absent`] (or `None` for an
//! `Option<T>`), which accepts every call and does nothing.

pub mod car;
pub mod command;
pub mod steering;

pub use car::{Car, CarBuilder, CarState, QUEUE_DEPTH};
pub use command::{CarOp, OpRequest};
pub use steering::{SteeringAngle, MAX_STEER};

use core::{convert::Infallible, fmt::Debug};

/// Drive engine: the two wheel pairs of the car.
pub trait Engine {
    type Error: Debug;

    fn forward(&mut self) -> Result<(), Self::Error>;
    fn backward(&mut self) -> Result<(), Self::Error>;
    /// Spin left in place; the dispatcher stops it after a short impulse.
    fn left(&mut self) -> Result<(), Self::Error>;
    /// Spin right in place; the dispatcher stops it after a short impulse.
    fn right(&mut self) -> Result<(), Self::Error>;
    fn stop(&mut self) -> Result<(), Self::Error>;

    fn is_fitted(&self) -> bool {
        true
    }
}

/// Steering servo.
pub trait Steering {
    type Error: Debug;

    /// Turn the wheels to `angle` degrees; negative is left.
    fn roll(
        &mut self,
        angle: i32,
    ) -> Result<(), Self::Error>;

    fn is_fitted(&self) -> bool {
        true
    }
}

/// Horn.
pub trait Horn {
    type Error: Debug;

    /// Emit one audible pulse.
    fn whistle(&mut self) -> Result<(), Self::Error>;

    fn is_fitted(&self) -> bool {
        true
    }
}

/// Indicator light.
pub trait Light {
    type Error: Debug;

    fn on(&mut self) -> Result<(), Self::Error>;
    fn off(&mut self) -> Result<(), Self::Error>;

    fn is_fitted(&self) -> bool {
        true
    }
}

/// A part that is not fitted. Every operation succeeds without effect.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Absent;

impl Engine for Absent {
    type Error = Infallible;

    fn forward(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn backward(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn left(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn right(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn stop(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn is_fitted(&self) -> bool {
        false
    }
}

impl Steering for Absent {
    type Error = Infallible;

    fn roll(
        &mut self,
        _angle: i32,
    ) -> Result<(), Infallible> {
        Ok(())
    }
    fn is_fitted(&self) -> bool {
        false
    }
}

impl Horn for Absent {
    type Error = Infallible;

    fn whistle(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn is_fitted(&self) -> bool {
        false
    }
}

impl Light for Absent {
    type Error = Infallible;

    fn on(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn off(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn is_fitted(&self) -> bool {
        false
    }
}

// Parts probed at boot may or may not be there; `None` acts like `Absent`.

impl<T: Engine> Engine for Option<T> {
    type Error = T::Error;

    fn forward(&mut self) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), T::forward)
    }
    fn backward(&mut self) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), T::backward)
    }
    fn left(&mut self) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), T::left)
    }
    fn right(&mut self) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), T::right)
    }
    fn stop(&mut self) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), T::stop)
    }
    fn is_fitted(&self) -> bool {
        self.as_ref().is_some_and(T::is_fitted)
    }
}

impl<T: Steering> Steering for Option<T> {
    type Error = T::Error;

    fn roll(
        &mut self,
        angle: i32,
    ) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), |s| s.roll(angle))
    }
    fn is_fitted(&self) -> bool {
        self.as_ref().is_some_and(T::is_fitted)
    }
}

impl<T: Horn> Horn for Option<T> {
    type Error = T::Error;

    fn whistle(&mut self) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), T::whistle)
    }
    fn is_fitted(&self) -> bool {
        self.as_ref().is_some_and(T::is_fitted)
    }
}

impl<T: Light> Light for Option<T> {
    type Error = T::Error;

    fn on(&mut self) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), T::on)
    }
    fn off(&mut self) -> Result<(), T::Error> {
        self.as_mut().map_or(Ok(()), T::off)
    }
    fn is_fitted(&self) -> bool {
        self.as_ref().is_some_and(T::is_fitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl Horn for Counter {
        type Error = Infallible;

        fn whistle(&mut self) -> Result<(), Infallible> {
            self.0 += 1;
            Ok(())
        }
    }

    #[test]
    fn absent_parts_report_unfitted() {
        assert!(!Engine::is_fitted(&Absent));
        assert!(!Steering::is_fitted(&Absent));
        assert!(!Horn::is_fitted(&Absent));
        assert!(!Light::is_fitted(&Absent));
    }

    #[test]
    fn option_forwards_only_when_some() {
        let mut fitted = Some(Counter(0));
        fitted.whistle().unwrap();
        fitted.whistle().unwrap();
        assert!(Horn::is_fitted(&fitted));
        assert_eq!(fitted.as_ref().map(|c| c.0), Some(2));

        let mut missing: Option<Counter> = None;
        missing.whistle().unwrap();
        assert!(!Horn::is_fitted(&missing));
    }
}
