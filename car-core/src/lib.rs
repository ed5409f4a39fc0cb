//! Command orchestration and actuator drivers for a remote-controlled car on
//! no-std embedded platforms.
//!
//! For a runnable host demo, see the `car-app/mock-car` binary.
#![no_std]

extern crate alloc;

pub mod utils;
