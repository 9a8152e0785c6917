//! Platform implementations
//!
//! Hardware bindings implement the core crate's traits; only the mock
//! platform lives in-tree, backing the host tests and SITL-style runs.

pub mod mock;
