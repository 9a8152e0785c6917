//! Navigation: great-circle math and the waypoint guidance loop
//!
//! [`geo`] holds the stateless bearing/distance functions; [`guidance`]
//! holds the AUTO-mode controller that turns navigation error into
//! attitude commands for the inner loop.

pub mod geo;
pub mod guidance;

pub use geo::{bearing_deg, distance_m, offset_position, wrap_180, wrap_360};
pub use guidance::{GuidanceConfig, GuidanceController, GuidanceOutput};
