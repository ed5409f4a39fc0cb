//! Errors surfaced by the car dispatcher.
//!
//! Only misuse of the lifecycle and the command boundary is reported here.
//! Actuator faults never reach the caller; the dispatcher logs them.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarError {
    /// `do_op`/`stop` was called before `start`.
    NotStarted,
    /// `start` was called on a car that is already running or stopped.
    AlreadyStarted,
    /// Another control loop is already draining the queue.
    AlreadyRunning,
    /// The car has been stopped; its queue no longer accepts commands.
    Stopped,
    /// The command queue is at capacity (only from `try_do`).
    QueueFull,
    /// The wire tag does not name a command.
    UnknownOp,
    /// The request body could not be decoded.
    Malformed,
}

impl fmt::Display for CarError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "car not started"),
            Self::AlreadyStarted => write!(f, "car already started"),
            Self::AlreadyRunning => write!(f, "control loop already running"),
            Self::Stopped => write!(f, "car stopped"),
            Self::QueueFull => write!(f, "command queue full"),
            Self::UnknownOp => write!(f, "unknown command"),
            Self::Malformed => write!(f, "malformed command request"),
        }
    }
}

impl core::error::Error for CarError {}
