//! Shared control subsystems

pub mod attitude;

pub use attitude::{AttitudeHold, AttitudeTarget};
