//! Firmware-side core glue
//!
//! Currently just the logging abstraction; the algorithmic core lives
//! in `skylark_core`.

pub mod logging;
