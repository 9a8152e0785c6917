//! Hand-launch detection
//!
//! One-way `Awaiting -> Climbing` state machine. While awaiting, the
//! detector keeps recording the current pitch so the climb-out target
//! always matches the attitude at the instant of release; the launch
//! itself is declared when any single body axis of the acceleration
//! vector exceeds the configured threshold.
//!
//! There is no way to distinguish a real launch from a hard knock or
//! turbulence; once climbing, the detector never returns to awaiting.

use nalgebra::Vector3;

/// Launch sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStatus {
    /// On the ground (or in hand), watching for the throw
    Awaiting,
    /// Airborne, holding the recorded climb attitude
    Climbing,
}

/// Launch behavior constants, loaded from `LaunchParams` at mode init.
#[derive(Debug, Clone, Copy)]
pub struct LaunchConfig {
    /// Single-axis acceleration magnitude that declares a launch (g)
    pub accel_threshold_g: f32,
    /// Delay before the deferred hand-off to AUTO fires (ms)
    pub settle_delay_ms: u32,
    /// Throttle while armed and awaiting (normalized)
    pub idle_throttle: f32,
    /// Throttle during climb-out (normalized)
    pub climb_throttle: f32,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            accel_threshold_g: 1.2,
            settle_delay_ms: 5_000,
            idle_throttle: 0.15,
            climb_throttle: 1.0,
        }
    }
}

/// The launch state machine proper.
#[derive(Debug)]
pub struct LaunchDetector {
    status: LaunchStatus,
    climb_angle_deg: f32,
    accel_threshold_g: f32,
}

impl LaunchDetector {
    pub fn new(accel_threshold_g: f32) -> Self {
        Self {
            status: LaunchStatus::Awaiting,
            climb_angle_deg: 0.0,
            accel_threshold_g,
        }
    }

    pub fn status(&self) -> LaunchStatus {
        self.status
    }

    /// Pitch captured at the instant of launch (degrees). While still
    /// awaiting, this tracks the live pitch.
    pub fn climb_angle_deg(&self) -> f32 {
        self.climb_angle_deg
    }

    pub fn is_climbing(&self) -> bool {
        self.status == LaunchStatus::Climbing
    }

    /// Feed one cycle of attitude and body acceleration.
    ///
    /// Returns `true` exactly once, on the cycle the launch is declared.
    /// After that the detector stays in `Climbing` and ignores input.
    pub fn update(&mut self, pitch_deg: f32, accel_g: Vector3<f32>) -> bool {
        if self.status == LaunchStatus::Climbing {
            return false;
        }

        self.climb_angle_deg = pitch_deg;

        let thrown = accel_g.x.abs() > self.accel_threshold_g
            || accel_g.y.abs() > self.accel_threshold_g
            || accel_g.z.abs() > self.accel_threshold_g;

        if thrown {
            self.status = LaunchStatus::Climbing;
        }
        thrown
    }
}
