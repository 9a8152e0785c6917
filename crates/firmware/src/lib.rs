#![cfg_attr(not(test), no_std)]

//! skylark_firmware - Plane vehicle layer for the skylark autopilot
//!
//! Wires the platform-agnostic control logic from `skylark_core` into a
//! flying-wing vehicle: the flight-mode implementations, the mode
//! manager, and the shared attitude-hold inner loop. Hardware bindings
//! (PWM out, receiver in, sensor drivers) live behind the core crate's
//! traits; the `platform::mock` implementations back the host tests.

// Logging macros and firmware-side core glue
pub mod core;

// Shared control subsystems (attitude-hold inner loop)
pub mod subsystems;

// Plane vehicle implementation: modes and mode manager
pub mod plane;

// Platform implementations (mock services for host testing)
pub mod platform;

// Note: Logging macros (log_info!, log_warn!, log_error!, log_debug!)
// are exported at crate root via #[macro_export] in core::logging
