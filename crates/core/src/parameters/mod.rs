//! Configuration parameters
//!
//! All tunable constants reach the control core through the
//! [`ParameterStore`], a bounded name/value map filled by the
//! configuration collaborator at startup. Typed parameter blocks
//! (`ControlParams`, `GuidanceParams`, `LaunchParams`) snapshot the
//! store into the config structs the controllers consume at mode-init
//! time.

pub mod control;
pub mod error;
pub mod guidance;
pub mod launch;
pub mod storage;

pub use control::{AttitudeParams, ControlParams};
pub use error::ParameterError;
pub use guidance::{BayParams, GuidanceParams};
pub use launch::LaunchParams;
pub use storage::{ParamFlags, ParamValue, ParameterStore};

/// Register every parameter block's defaults into a fresh store.
pub fn register_all_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
    ControlParams::register_defaults(store)?;
    GuidanceParams::register_defaults(store)?;
    BayParams::register_defaults(store)?;
    LaunchParams::register_defaults(store)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_defaults() {
        let mut store = ParameterStore::new();
        register_all_defaults(&mut store).unwrap();

        assert!(store.get("RATE_RLL_DPS").is_some());
        assert!(store.get("NAV_WP_RADIUS").is_some());
        assert!(store.get("LNCH_ACCEL_G").is_some());
        assert!(store.get("BAY_OPEN_DEG").is_some());
    }
}
