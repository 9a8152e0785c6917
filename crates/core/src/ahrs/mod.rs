//! Attitude and position snapshot types
//!
//! The sensor-fusion and GPS collaborators publish one snapshot of each
//! per superloop iteration; the control core only ever reads them. No
//! sanitizing happens here - degenerate values propagate into the math
//! by design, gated only by the health flags.

use nalgebra::Vector3;

use crate::nav::geo::wrap_360;

/// One attitude sample from the AAHRS collaborator.
#[derive(Debug, Clone, Copy)]
pub struct AttitudeSnapshot {
    /// Roll angle in degrees, right wing down positive
    pub roll_deg: f32,
    /// Pitch angle in degrees, nose up positive
    pub pitch_deg: f32,
    /// Yaw angle in degrees
    pub yaw_deg: f32,
    /// Body-frame acceleration in g
    pub accel_g: Vector3<f32>,
    /// True while the fusion solution is converged and fresh
    pub healthy: bool,
}

impl AttitudeSnapshot {
    /// Level snapshot at 1 g, useful as a test fixture.
    pub fn level() -> Self {
        Self {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            accel_g: Vector3::new(0.0, 0.0, 1.0),
            healthy: true,
        }
    }

    /// Heading in `[0, 360)` degrees.
    pub fn heading_deg(&self) -> f32 {
        wrap_360(self.yaw_deg)
    }
}

impl Default for AttitudeSnapshot {
    fn default() -> Self {
        Self {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            accel_g: Vector3::zeros(),
            healthy: false,
        }
    }
}

/// One position sample from the GPS collaborator.
#[derive(Debug, Clone, Copy)]
pub struct PositionFix {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude above mean sea level in meters
    pub alt_m: f32,
    /// True while the fix quality is acceptable
    pub healthy: bool,
}

impl PositionFix {
    pub fn new(lat: f64, lon: f64, alt_m: f32) -> Self {
        Self {
            lat,
            lon,
            alt_m,
            healthy: true,
        }
    }
}

impl Default for PositionFix {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            alt_m: 0.0,
            healthy: false,
        }
    }
}
