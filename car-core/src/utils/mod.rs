//! Utility re-exports and helper macros for the car.
//!
//! This module re-exports the dispatcher, its configuration and the reference
//! drivers:
//!
//! - `controllers`: capability contracts, command vocabulary and the `Car`
//!   actor that serializes commands against the actuators
//! - `drivers`: embedded-hal implementations of the capability contracts
//! - `config`: timing and steering geometry
//! - `error`: dispatcher errors
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod config;
pub mod controllers;
pub mod drivers;
pub mod error;

pub use config::CarConfig;
pub use controllers::{Car, CarBuilder, CarOp};
pub use embassy_time::{Duration, Instant, Timer};
pub use error::CarError;

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
