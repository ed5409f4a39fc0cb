//! L298N dual H-bridge.
//!
//! `in1`/`in2` drive the left wheel pair and `in3`/`in4` the right one. The
//! enable pins are expected to be tied high (full speed).

use embedded_hal::digital::{OutputPin, PinState};

use crate::utils::controllers::Engine;

pub struct L298n<P> {
    in1: P,
    in2: P,
    in3: P,
    in4: P,
}

impl<P, E> L298n<P>
where
    P: OutputPin<Error = E>,
    E: core::fmt::Debug,
{
    pub fn new(
        in1: P,
        in2: P,
        in3: P,
        in4: P,
    ) -> Self {
        Self { in1, in2, in3, in4 }
    }

    /// Set each wheel pair: `Some(true)` forward, `Some(false)` backward,
    /// `None` coasting.
    fn drive(
        &mut self,
        left: Option<bool>,
        right: Option<bool>,
    ) -> Result<(), E> {
        let (a, b) = pin_states(left);
        self.in1.set_state(a)?;
        self.in2.set_state(b)?;
        let (c, d) = pin_states(right);
        self.in3.set_state(c)?;
        self.in4.set_state(d)
    }
}

fn pin_states(dir: Option<bool>) -> (PinState, PinState) {
    match dir {
        Some(true) => (PinState::High, PinState::Low),
        Some(false) => (PinState::Low, PinState::High),
        None => (PinState::Low, PinState::Low),
    }
}

impl<P, E> Engine for L298n<P>
where
    P: OutputPin<Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn forward(&mut self) -> Result<(), E> {
        self.drive(Some(true), Some(true))
    }

    fn backward(&mut self) -> Result<(), E> {
        self.drive(Some(false), Some(false))
    }

    fn left(&mut self) -> Result<(), E> {
        self.drive(Some(false), Some(true))
    }

    fn right(&mut self) -> Result<(), E> {
        self.drive(Some(true), Some(false))
    }

    fn stop(&mut self) -> Result<(), E> {
        self.drive(None, None)
    }
}
