//! Platform trait abstractions

mod time;

pub use time::{MockTime, TimeSource};
