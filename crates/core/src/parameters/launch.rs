//! Launch detection parameters
//!
//! - `LNCH_ACCEL_G` - single-axis acceleration that declares a launch
//! - `LNCH_DELAY_MS` - settle delay before the deferred AUTO hand-off
//! - `LNCH_IDLE_THR` / `LNCH_CLMB_THR` - throttle while armed / climbing

use super::error::ParameterError;
use super::storage::{load_float, load_int, ParamFlags, ParamValue, ParameterStore};
use crate::launch::LaunchConfig;

const DEFAULT_ACCEL_G: f32 = 1.2;
const DEFAULT_DELAY_MS: i32 = 5_000;
const DEFAULT_IDLE_THROTTLE: f32 = 0.15;
const DEFAULT_CLIMB_THROTTLE: f32 = 1.0;

const MIN_ACCEL_G: f32 = 1.05;
const MAX_ACCEL_G: f32 = 8.0;
const MIN_DELAY_MS: i32 = 0;
const MAX_DELAY_MS: i32 = 60_000;

/// Launch parameters loaded from the store.
#[derive(Debug, Clone, Copy)]
pub struct LaunchParams {
    pub accel_threshold_g: f32,
    pub settle_delay_ms: u32,
    pub idle_throttle: f32,
    pub climb_throttle: f32,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            accel_threshold_g: DEFAULT_ACCEL_G,
            settle_delay_ms: DEFAULT_DELAY_MS as u32,
            idle_throttle: DEFAULT_IDLE_THROTTLE,
            climb_throttle: DEFAULT_CLIMB_THROTTLE,
        }
    }
}

impl LaunchParams {
    /// Register launch parameters with default values.
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "LNCH_ACCEL_G",
            ParamValue::Float(DEFAULT_ACCEL_G),
            ParamFlags::empty(),
        )?;
        store.register(
            "LNCH_DELAY_MS",
            ParamValue::Int(DEFAULT_DELAY_MS),
            ParamFlags::empty(),
        )?;
        store.register(
            "LNCH_IDLE_THR",
            ParamValue::Float(DEFAULT_IDLE_THROTTLE),
            ParamFlags::empty(),
        )?;
        store.register(
            "LNCH_CLMB_THR",
            ParamValue::Float(DEFAULT_CLIMB_THROTTLE),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load launch parameters from the store with clamping.
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            accel_threshold_g: load_float(
                store,
                "LNCH_ACCEL_G",
                DEFAULT_ACCEL_G,
                MIN_ACCEL_G,
                MAX_ACCEL_G,
            ),
            settle_delay_ms: load_int(
                store,
                "LNCH_DELAY_MS",
                DEFAULT_DELAY_MS,
                MIN_DELAY_MS,
                MAX_DELAY_MS,
            ) as u32,
            idle_throttle: load_float(store, "LNCH_IDLE_THR", DEFAULT_IDLE_THROTTLE, 0.0, 0.5),
            climb_throttle: load_float(store, "LNCH_CLMB_THR", DEFAULT_CLIMB_THROTTLE, 0.5, 1.0),
        }
    }

    /// Convert to the launch detector configuration.
    pub fn to_launch_config(&self) -> LaunchConfig {
        LaunchConfig {
            accel_threshold_g: self.accel_threshold_g,
            settle_delay_ms: self.settle_delay_ms,
            idle_throttle: self.idle_throttle,
            climb_throttle: self.climb_throttle,
        }
    }

    /// Validate loaded parameters.
    pub fn is_valid(&self) -> bool {
        self.accel_threshold_g > 1.0 && self.idle_throttle < self.climb_throttle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = LaunchParams::default();
        assert!(params.is_valid());
        assert_eq!(params.accel_threshold_g, 1.2);
        assert_eq!(params.settle_delay_ms, 5_000);
    }

    #[test]
    fn test_from_store_clamps_threshold() {
        let mut store = ParameterStore::new();
        LaunchParams::register_defaults(&mut store).unwrap();

        // A threshold at or below 1 g would fire while sitting still.
        store.set("LNCH_ACCEL_G", ParamValue::Float(0.5)).unwrap();
        let params = LaunchParams::from_store(&store);
        assert_eq!(params.accel_threshold_g, MIN_ACCEL_G);
    }

    #[test]
    fn test_to_launch_config() {
        let config = LaunchParams::default().to_launch_config();
        assert_eq!(config.accel_threshold_g, 1.2);
        assert_eq!(config.settle_delay_ms, 5_000);
        assert_eq!(config.climb_throttle, 1.0);
    }
}
