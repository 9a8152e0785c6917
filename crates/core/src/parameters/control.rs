//! Rate-loop, attitude-hold, and elevon mixing parameters
//!
//! Covers the NORMAL-mode rate loop and the shared attitude-hold inner
//! loop:
//!
//! - `RATE_RLL_DPS` / `RATE_PIT_DPS` - full-deflection axis rates
//! - `ATT_RLL_*` / `ATT_PIT_*` - inner-loop PID gains and filter
//! - `MIX_GAIN`, `MIX_RLL_BIAS`, `MIX_PIT_BIAS` - elevon mixing weights
//! - `MIX_RLL_REV`, `MIX_PIT_REV` - per-axis servo direction reversal

use super::error::ParameterError;
use super::storage::{load_bool, load_float, ParamFlags, ParamValue, ParameterStore};
use crate::mixing::{ElevonConfig, RateConfig};
use crate::pid::PidConfig;

const DEFAULT_ROLL_RATE_DPS: f32 = 60.0;
const DEFAULT_PITCH_RATE_DPS: f32 = 30.0;

const DEFAULT_ATT_KP: f32 = 1.0;
const DEFAULT_ATT_KI: f32 = 0.2;
const DEFAULT_ATT_KD: f32 = 0.05;
const DEFAULT_ATT_TAU: f32 = 0.05;

const DEFAULT_MIX_GAIN: f32 = 1.0;
const DEFAULT_MIX_BIAS: f32 = 1.0;

const MIN_RATE_DPS: f32 = 5.0;
const MAX_RATE_DPS: f32 = 360.0;
const MIN_GAIN: f32 = 0.0;
const MAX_GAIN: f32 = 10.0;
const MIN_TAU: f32 = 0.001;
const MAX_TAU: f32 = 1.0;

/// Inner-loop deflection command limit (degrees). The mixer input range
/// is -90..90 by construction, so this is not a parameter.
const ATT_OUTPUT_LIMIT_DEG: f64 = 90.0;

/// Nominal control loop period (seconds, 50 Hz superloop).
pub const CONTROL_LOOP_DT: f64 = 0.02;

/// Attitude-hold inner loop gains for one axis pair.
#[derive(Debug, Clone, Copy)]
pub struct AttitudeParams {
    pub roll_kp: f32,
    pub roll_ki: f32,
    pub roll_kd: f32,
    pub roll_tau: f32,
    pub pitch_kp: f32,
    pub pitch_ki: f32,
    pub pitch_kd: f32,
    pub pitch_tau: f32,
}

impl Default for AttitudeParams {
    fn default() -> Self {
        Self {
            roll_kp: DEFAULT_ATT_KP,
            roll_ki: DEFAULT_ATT_KI,
            roll_kd: DEFAULT_ATT_KD,
            roll_tau: DEFAULT_ATT_TAU,
            pitch_kp: DEFAULT_ATT_KP,
            pitch_ki: DEFAULT_ATT_KI,
            pitch_kd: DEFAULT_ATT_KD,
            pitch_tau: DEFAULT_ATT_TAU,
        }
    }
}

impl AttitudeParams {
    fn axis_config(kp: f32, ki: f32, kd: f32, tau: f32) -> PidConfig {
        PidConfig {
            kp: f64::from(kp),
            ki: f64::from(ki),
            kd: f64::from(kd),
            tau: f64::from(tau),
            lim_min: -ATT_OUTPUT_LIMIT_DEG,
            lim_max: ATT_OUTPUT_LIMIT_DEG,
            nominal_dt: CONTROL_LOOP_DT,
            ..PidConfig::default()
        }
    }

    /// Roll-axis PID tuning for the inner loop.
    pub fn to_roll_pid(&self) -> PidConfig {
        Self::axis_config(self.roll_kp, self.roll_ki, self.roll_kd, self.roll_tau)
    }

    /// Pitch-axis PID tuning for the inner loop.
    pub fn to_pitch_pid(&self) -> PidConfig {
        Self::axis_config(self.pitch_kp, self.pitch_ki, self.pitch_kd, self.pitch_tau)
    }
}

/// Rate and mixing parameters loaded from the store.
#[derive(Debug, Clone, Copy)]
pub struct ControlParams {
    pub roll_rate_dps: f32,
    pub pitch_rate_dps: f32,
    pub attitude: AttitudeParams,
    pub mix_gain: f32,
    pub mix_roll_bias: f32,
    pub mix_pitch_bias: f32,
    pub mix_roll_reversed: bool,
    pub mix_pitch_reversed: bool,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            roll_rate_dps: DEFAULT_ROLL_RATE_DPS,
            pitch_rate_dps: DEFAULT_PITCH_RATE_DPS,
            attitude: AttitudeParams::default(),
            mix_gain: DEFAULT_MIX_GAIN,
            mix_roll_bias: DEFAULT_MIX_BIAS,
            mix_pitch_bias: DEFAULT_MIX_BIAS,
            mix_roll_reversed: false,
            mix_pitch_reversed: false,
        }
    }
}

impl ControlParams {
    /// Register control parameters with default values.
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "RATE_RLL_DPS",
            ParamValue::Float(DEFAULT_ROLL_RATE_DPS),
            ParamFlags::empty(),
        )?;
        store.register(
            "RATE_PIT_DPS",
            ParamValue::Float(DEFAULT_PITCH_RATE_DPS),
            ParamFlags::empty(),
        )?;
        for name in ["ATT_RLL_KP", "ATT_PIT_KP"] {
            store.register(name, ParamValue::Float(DEFAULT_ATT_KP), ParamFlags::empty())?;
        }
        for name in ["ATT_RLL_KI", "ATT_PIT_KI"] {
            store.register(name, ParamValue::Float(DEFAULT_ATT_KI), ParamFlags::empty())?;
        }
        for name in ["ATT_RLL_KD", "ATT_PIT_KD"] {
            store.register(name, ParamValue::Float(DEFAULT_ATT_KD), ParamFlags::empty())?;
        }
        for name in ["ATT_RLL_TAU", "ATT_PIT_TAU"] {
            store.register(name, ParamValue::Float(DEFAULT_ATT_TAU), ParamFlags::empty())?;
        }
        store.register(
            "MIX_GAIN",
            ParamValue::Float(DEFAULT_MIX_GAIN),
            ParamFlags::empty(),
        )?;
        store.register(
            "MIX_RLL_BIAS",
            ParamValue::Float(DEFAULT_MIX_BIAS),
            ParamFlags::empty(),
        )?;
        store.register(
            "MIX_PIT_BIAS",
            ParamValue::Float(DEFAULT_MIX_BIAS),
            ParamFlags::empty(),
        )?;
        store.register("MIX_RLL_REV", ParamValue::Bool(false), ParamFlags::empty())?;
        store.register("MIX_PIT_REV", ParamValue::Bool(false), ParamFlags::empty())?;
        Ok(())
    }

    /// Load control parameters from the store with clamping.
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            roll_rate_dps: load_float(
                store,
                "RATE_RLL_DPS",
                DEFAULT_ROLL_RATE_DPS,
                MIN_RATE_DPS,
                MAX_RATE_DPS,
            ),
            pitch_rate_dps: load_float(
                store,
                "RATE_PIT_DPS",
                DEFAULT_PITCH_RATE_DPS,
                MIN_RATE_DPS,
                MAX_RATE_DPS,
            ),
            attitude: AttitudeParams {
                roll_kp: load_float(store, "ATT_RLL_KP", DEFAULT_ATT_KP, MIN_GAIN, MAX_GAIN),
                roll_ki: load_float(store, "ATT_RLL_KI", DEFAULT_ATT_KI, MIN_GAIN, MAX_GAIN),
                roll_kd: load_float(store, "ATT_RLL_KD", DEFAULT_ATT_KD, MIN_GAIN, MAX_GAIN),
                roll_tau: load_float(store, "ATT_RLL_TAU", DEFAULT_ATT_TAU, MIN_TAU, MAX_TAU),
                pitch_kp: load_float(store, "ATT_PIT_KP", DEFAULT_ATT_KP, MIN_GAIN, MAX_GAIN),
                pitch_ki: load_float(store, "ATT_PIT_KI", DEFAULT_ATT_KI, MIN_GAIN, MAX_GAIN),
                pitch_kd: load_float(store, "ATT_PIT_KD", DEFAULT_ATT_KD, MIN_GAIN, MAX_GAIN),
                pitch_tau: load_float(store, "ATT_PIT_TAU", DEFAULT_ATT_TAU, MIN_TAU, MAX_TAU),
            },
            mix_gain: load_float(store, "MIX_GAIN", DEFAULT_MIX_GAIN, MIN_GAIN, MAX_GAIN),
            mix_roll_bias: load_float(store, "MIX_RLL_BIAS", DEFAULT_MIX_BIAS, 0.0, 1.0),
            mix_pitch_bias: load_float(store, "MIX_PIT_BIAS", DEFAULT_MIX_BIAS, 0.0, 1.0),
            mix_roll_reversed: load_bool(store, "MIX_RLL_REV", false),
            mix_pitch_reversed: load_bool(store, "MIX_PIT_REV", false),
        }
    }

    /// Per-axis rate configuration for the rate mixer.
    pub fn to_rate_config(&self) -> RateConfig {
        RateConfig {
            roll_max_dps: self.roll_rate_dps,
            pitch_max_dps: self.pitch_rate_dps,
        }
    }

    /// Elevon mixing configuration.
    pub fn to_elevon_config(&self) -> ElevonConfig {
        ElevonConfig {
            gain: self.mix_gain,
            roll_bias: self.mix_roll_bias,
            pitch_bias: self.mix_pitch_bias,
            roll_sign: if self.mix_roll_reversed { -1.0 } else { 1.0 },
            pitch_sign: if self.mix_pitch_reversed { -1.0 } else { 1.0 },
        }
    }

    /// Validate loaded parameters.
    pub fn is_valid(&self) -> bool {
        self.roll_rate_dps >= MIN_RATE_DPS
            && self.roll_rate_dps <= MAX_RATE_DPS
            && self.pitch_rate_dps >= MIN_RATE_DPS
            && self.pitch_rate_dps <= MAX_RATE_DPS
            && self.mix_gain > 0.0
            && self.attitude.roll_tau > 0.0
            && self.attitude.pitch_tau > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = ControlParams::default();
        assert!(params.is_valid());
        assert_eq!(params.roll_rate_dps, 60.0);
        assert_eq!(params.pitch_rate_dps, 30.0);
    }

    #[test]
    fn test_from_store_reads_defaults() {
        let mut store = ParameterStore::new();
        ControlParams::register_defaults(&mut store).unwrap();

        let params = ControlParams::from_store(&store);
        assert_eq!(params.roll_rate_dps, DEFAULT_ROLL_RATE_DPS);
        assert_eq!(params.attitude.roll_kp, DEFAULT_ATT_KP);
        assert!(!params.mix_roll_reversed);
    }

    #[test]
    fn test_from_store_custom_values_clamped() {
        let mut store = ParameterStore::new();
        ControlParams::register_defaults(&mut store).unwrap();

        store.set("RATE_RLL_DPS", ParamValue::Float(1000.0)).unwrap();
        store.set("MIX_RLL_REV", ParamValue::Bool(true)).unwrap();

        let params = ControlParams::from_store(&store);
        assert_eq!(params.roll_rate_dps, MAX_RATE_DPS);
        assert!(params.mix_roll_reversed);
        assert_eq!(params.to_elevon_config().roll_sign, -1.0);
    }

    #[test]
    fn test_attitude_pid_configs() {
        let params = ControlParams::default();
        let roll = params.attitude.to_roll_pid();

        assert_eq!(roll.kp, f64::from(DEFAULT_ATT_KP));
        assert_eq!(roll.lim_max, 90.0);
        assert_eq!(roll.lim_min, -90.0);
        assert!(roll.is_valid());
        assert!(params.attitude.to_pitch_pid().is_valid());
    }
}
