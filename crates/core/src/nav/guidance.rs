//! Waypoint guidance loop
//!
//! The AUTO-mode outer controller: converts bearing/distance/altitude
//! error to the active waypoint into roll and pitch commands for the
//! attitude-hold inner loop. Owns one lateral (heading error to roll)
//! and one vertical (altitude error to pitch) PID controller.
//!
//! Replacing the waypoint does NOT reset the PIDs: control stays
//! continuous across waypoint changes. Mode entry resets them.

use crate::mission::Waypoint;
use crate::nav::geo::{bearing_deg, distance_m, wrap_180};
use crate::pid::{PidConfig, PidController};

/// Guidance tuning, built from `GuidanceParams` at mode-init time.
#[derive(Debug, Clone, Copy)]
pub struct GuidanceConfig {
    /// Lateral PID: heading error (degrees) in, roll command (degrees) out.
    /// Output limits are the roll clamp.
    pub lateral: PidConfig,
    /// Vertical PID: altitude error (meters) in, pitch command (degrees)
    /// out. Output limits are the pitch clamps.
    pub vertical: PidConfig,
    /// Arrival threshold in meters.
    pub wp_radius_m: f32,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            lateral: PidConfig {
                kp: 0.6,
                ki: 0.05,
                kd: 0.1,
                tau: 0.5,
                lim_min: -33.0,
                lim_max: 33.0,
                nominal_dt: 0.02,
                ..PidConfig::default()
            },
            vertical: PidConfig {
                kp: 1.2,
                ki: 0.1,
                kd: 0.2,
                tau: 0.5,
                lim_min: -15.0,
                lim_max: 25.0,
                nominal_dt: 0.02,
                ..PidConfig::default()
            },
            wp_radius_m: 15.0,
        }
    }
}

/// One cycle of guidance output plus telemetry.
#[derive(Debug, Clone, Copy)]
pub struct GuidanceOutput {
    /// Commanded roll for the inner loop (degrees, clamped)
    pub roll_cmd: f32,
    /// Commanded pitch for the inner loop (degrees, clamped)
    pub pitch_cmd: f32,
    /// Remaining distance to the waypoint (meters)
    pub distance_m: f32,
    /// Bearing to the waypoint (degrees, 0-360)
    pub bearing_deg: f32,
    /// Signed shortest heading error (degrees, -180..180)
    pub heading_error_deg: f32,
    /// True when the remaining distance is inside the arrival radius
    pub at_waypoint: bool,
}

/// Waypoint guidance controller.
pub struct GuidanceController {
    config: GuidanceConfig,
    lateral: PidController,
    vertical: PidController,
    target: Option<Waypoint>,
}

impl GuidanceController {
    pub fn new(config: GuidanceConfig) -> Self {
        Self {
            lateral: PidController::new(config.lateral),
            vertical: PidController::new(config.vertical),
            target: None,
            config,
        }
    }

    /// Replace the active waypoint. The guidance PIDs keep their state.
    pub fn set_waypoint(&mut self, wp: Waypoint) {
        self.target = Some(wp);
    }

    /// The active waypoint, if any.
    pub fn target(&self) -> Option<&Waypoint> {
        self.target.as_ref()
    }

    /// Drop the active waypoint.
    pub fn clear(&mut self) {
        self.target = None;
    }

    /// Zero the guidance PID state. Called on mode entry, never on
    /// waypoint replacement.
    pub fn reset(&mut self) {
        self.lateral.init();
        self.vertical.init();
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    /// Run one guidance cycle against the current position and attitude.
    ///
    /// Returns `None` when no waypoint is active.
    pub fn update(
        &mut self,
        lat: f64,
        lon: f64,
        alt_m: f32,
        heading_deg: f32,
        now_us: u64,
    ) -> Option<GuidanceOutput> {
        let wp = self.target?;

        let bearing = bearing_deg(lat, lon, wp.lat, wp.lon);
        let distance = distance_m(lat, lon, wp.lat, wp.lon);
        let heading_error = wrap_180(bearing as f32 - heading_deg);

        // The lateral PID sees the wrapped error as its measurement so the
        // derivative term still tracks heading motion.
        let roll_cmd = self
            .lateral
            .update(0.0, -f64::from(heading_error), now_us) as f32;

        let target_alt = if wp.holds_altitude() {
            alt_m
        } else {
            wp.alt_m as f32
        };
        let pitch_cmd = self
            .vertical
            .update(f64::from(target_alt), f64::from(alt_m), now_us) as f32;

        Some(GuidanceOutput {
            roll_cmd,
            pitch_cmd,
            distance_m: distance as f32,
            bearing_deg: bearing as f32,
            heading_error_deg: heading_error,
            at_waypoint: (distance as f32) < self.config.wp_radius_m,
        })
    }
}
