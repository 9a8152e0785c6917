//! Waypoint guidance and drop-bay parameters
//!
//! - `NAV_RLL_*` - lateral (heading to roll) PID gains and roll clamp
//! - `NAV_PIT_*` - vertical (altitude to pitch) PID gains and clamps
//! - `NAV_WP_RADIUS` - arrival threshold in meters
//! - `NAV_CRUISE_SPD` - full-throttle reference speed for leg speed scaling
//! - `BAY_OPEN_DEG` / `BAY_CLOSE_DEG` - drop-bay servo detents

use super::error::ParameterError;
use super::storage::{load_float, ParamFlags, ParamValue, ParameterStore};
use crate::actuator::BayPosition;
use crate::nav::GuidanceConfig;
use crate::parameters::control::CONTROL_LOOP_DT;
use crate::pid::PidConfig;

const DEFAULT_LAT_KP: f32 = 0.6;
const DEFAULT_LAT_KI: f32 = 0.05;
const DEFAULT_LAT_KD: f32 = 0.1;
const DEFAULT_LAT_TAU: f32 = 0.5;
const DEFAULT_ROLL_LIMIT_DEG: f32 = 33.0;

const DEFAULT_VRT_KP: f32 = 1.2;
const DEFAULT_VRT_KI: f32 = 0.1;
const DEFAULT_VRT_KD: f32 = 0.2;
const DEFAULT_VRT_TAU: f32 = 0.5;
const DEFAULT_PITCH_MIN_DEG: f32 = -15.0;
const DEFAULT_PITCH_MAX_DEG: f32 = 25.0;

const DEFAULT_WP_RADIUS_M: f32 = 15.0;
const DEFAULT_CRUISE_SPEED: f32 = 12.0;

const DEFAULT_BAY_OPEN_DEG: f32 = 170.0;
const DEFAULT_BAY_CLOSE_DEG: f32 = 90.0;

const MIN_GAIN: f32 = 0.0;
const MAX_GAIN: f32 = 10.0;
const MIN_TAU: f32 = 0.001;
const MAX_TAU: f32 = 2.0;
const MIN_WP_RADIUS: f32 = 2.0;
const MAX_WP_RADIUS: f32 = 200.0;

/// Guidance loop parameters loaded from the store.
#[derive(Debug, Clone, Copy)]
pub struct GuidanceParams {
    pub lat_kp: f32,
    pub lat_ki: f32,
    pub lat_kd: f32,
    pub lat_tau: f32,
    pub roll_limit_deg: f32,
    pub vrt_kp: f32,
    pub vrt_ki: f32,
    pub vrt_kd: f32,
    pub vrt_tau: f32,
    pub pitch_min_deg: f32,
    pub pitch_max_deg: f32,
    pub wp_radius_m: f32,
    pub cruise_speed: f32,
}

impl Default for GuidanceParams {
    fn default() -> Self {
        Self {
            lat_kp: DEFAULT_LAT_KP,
            lat_ki: DEFAULT_LAT_KI,
            lat_kd: DEFAULT_LAT_KD,
            lat_tau: DEFAULT_LAT_TAU,
            roll_limit_deg: DEFAULT_ROLL_LIMIT_DEG,
            vrt_kp: DEFAULT_VRT_KP,
            vrt_ki: DEFAULT_VRT_KI,
            vrt_kd: DEFAULT_VRT_KD,
            vrt_tau: DEFAULT_VRT_TAU,
            pitch_min_deg: DEFAULT_PITCH_MIN_DEG,
            pitch_max_deg: DEFAULT_PITCH_MAX_DEG,
            wp_radius_m: DEFAULT_WP_RADIUS_M,
            cruise_speed: DEFAULT_CRUISE_SPEED,
        }
    }
}

impl GuidanceParams {
    /// Register guidance parameters with default values.
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let floats: [(&str, f32); 13] = [
            ("NAV_RLL_KP", DEFAULT_LAT_KP),
            ("NAV_RLL_KI", DEFAULT_LAT_KI),
            ("NAV_RLL_KD", DEFAULT_LAT_KD),
            ("NAV_RLL_TAU", DEFAULT_LAT_TAU),
            ("NAV_RLL_LIM", DEFAULT_ROLL_LIMIT_DEG),
            ("NAV_PIT_KP", DEFAULT_VRT_KP),
            ("NAV_PIT_KI", DEFAULT_VRT_KI),
            ("NAV_PIT_KD", DEFAULT_VRT_KD),
            ("NAV_PIT_TAU", DEFAULT_VRT_TAU),
            ("NAV_PIT_MIN", DEFAULT_PITCH_MIN_DEG),
            ("NAV_PIT_MAX", DEFAULT_PITCH_MAX_DEG),
            ("NAV_WP_RADIUS", DEFAULT_WP_RADIUS_M),
            ("NAV_CRUISE_SPD", DEFAULT_CRUISE_SPEED),
        ];
        for (name, value) in floats {
            store.register(name, ParamValue::Float(value), ParamFlags::empty())?;
        }
        Ok(())
    }

    /// Load guidance parameters from the store with clamping.
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            lat_kp: load_float(store, "NAV_RLL_KP", DEFAULT_LAT_KP, MIN_GAIN, MAX_GAIN),
            lat_ki: load_float(store, "NAV_RLL_KI", DEFAULT_LAT_KI, MIN_GAIN, MAX_GAIN),
            lat_kd: load_float(store, "NAV_RLL_KD", DEFAULT_LAT_KD, MIN_GAIN, MAX_GAIN),
            lat_tau: load_float(store, "NAV_RLL_TAU", DEFAULT_LAT_TAU, MIN_TAU, MAX_TAU),
            roll_limit_deg: load_float(store, "NAV_RLL_LIM", DEFAULT_ROLL_LIMIT_DEG, 5.0, 60.0),
            vrt_kp: load_float(store, "NAV_PIT_KP", DEFAULT_VRT_KP, MIN_GAIN, MAX_GAIN),
            vrt_ki: load_float(store, "NAV_PIT_KI", DEFAULT_VRT_KI, MIN_GAIN, MAX_GAIN),
            vrt_kd: load_float(store, "NAV_PIT_KD", DEFAULT_VRT_KD, MIN_GAIN, MAX_GAIN),
            vrt_tau: load_float(store, "NAV_PIT_TAU", DEFAULT_VRT_TAU, MIN_TAU, MAX_TAU),
            pitch_min_deg: load_float(store, "NAV_PIT_MIN", DEFAULT_PITCH_MIN_DEG, -45.0, 0.0),
            pitch_max_deg: load_float(store, "NAV_PIT_MAX", DEFAULT_PITCH_MAX_DEG, 0.0, 45.0),
            wp_radius_m: load_float(
                store,
                "NAV_WP_RADIUS",
                DEFAULT_WP_RADIUS_M,
                MIN_WP_RADIUS,
                MAX_WP_RADIUS,
            ),
            cruise_speed: load_float(store, "NAV_CRUISE_SPD", DEFAULT_CRUISE_SPEED, 1.0, 50.0),
        }
    }

    /// Convert to the guidance controller configuration.
    pub fn to_guidance_config(&self) -> GuidanceConfig {
        GuidanceConfig {
            lateral: PidConfig {
                kp: f64::from(self.lat_kp),
                ki: f64::from(self.lat_ki),
                kd: f64::from(self.lat_kd),
                tau: f64::from(self.lat_tau),
                lim_min: -f64::from(self.roll_limit_deg),
                lim_max: f64::from(self.roll_limit_deg),
                nominal_dt: CONTROL_LOOP_DT,
                ..PidConfig::default()
            },
            vertical: PidConfig {
                kp: f64::from(self.vrt_kp),
                ki: f64::from(self.vrt_ki),
                kd: f64::from(self.vrt_kd),
                tau: f64::from(self.vrt_tau),
                lim_min: f64::from(self.pitch_min_deg),
                lim_max: f64::from(self.pitch_max_deg),
                nominal_dt: CONTROL_LOOP_DT,
                ..PidConfig::default()
            },
            wp_radius_m: self.wp_radius_m,
        }
    }

    /// Validate loaded parameters.
    pub fn is_valid(&self) -> bool {
        self.roll_limit_deg > 0.0
            && self.pitch_min_deg < self.pitch_max_deg
            && self.wp_radius_m >= MIN_WP_RADIUS
            && self.lat_tau > 0.0
            && self.vrt_tau > 0.0
    }
}

/// Drop-bay servo detents.
#[derive(Debug, Clone, Copy)]
pub struct BayParams {
    pub open_deg: f32,
    pub close_deg: f32,
}

impl Default for BayParams {
    fn default() -> Self {
        Self {
            open_deg: DEFAULT_BAY_OPEN_DEG,
            close_deg: DEFAULT_BAY_CLOSE_DEG,
        }
    }
}

impl BayParams {
    /// Register bay parameters with default values.
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "BAY_OPEN_DEG",
            ParamValue::Float(DEFAULT_BAY_OPEN_DEG),
            ParamFlags::empty(),
        )?;
        store.register(
            "BAY_CLOSE_DEG",
            ParamValue::Float(DEFAULT_BAY_CLOSE_DEG),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load bay parameters from the store.
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            open_deg: load_float(store, "BAY_OPEN_DEG", DEFAULT_BAY_OPEN_DEG, 0.0, 180.0),
            close_deg: load_float(store, "BAY_CLOSE_DEG", DEFAULT_BAY_CLOSE_DEG, 0.0, 180.0),
        }
    }

    /// Detent angle for a commanded bay position. `Invalid` commands
    /// nothing.
    pub fn detent_for(&self, position: BayPosition) -> Option<f32> {
        match position {
            BayPosition::Open => Some(self.open_deg),
            BayPosition::Closed => Some(self.close_deg),
            BayPosition::Invalid => None,
        }
    }
}
