//! Hold Mode
//!
//! Degraded fallback: wings level, fixed cruise throttle, no navigation.
//! This is where AUTO lands when the position solution goes bad.

use super::{Mode, PlaneContext};

/// Throttle while holding (normalized).
const HOLD_THROTTLE: f32 = 0.4;

/// Wings-level hold mode.
#[derive(Default)]
pub struct HoldMode;

impl HoldMode {
    pub fn new() -> Self {
        Self
    }
}

impl Mode for HoldMode {
    fn enter(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        ctx.attitude_hold.init()?;
        ctx.attitude_hold.set_target(0.0, 0.0, 0.0);
        crate::log_info!("Entering Hold mode");
        Ok(())
    }

    fn update(&mut self, ctx: &mut PlaneContext, _dt: f32) -> Result<(), &'static str> {
        ctx.attitude_hold
            .update(&ctx.attitude, ctx.actuators, ctx.now_us)?;
        ctx.actuators.set_throttle(HOLD_THROTTLE)
    }

    fn exit(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        ctx.attitude_hold.reset();
        ctx.actuators.neutral()
    }

    fn name(&self) -> &'static str {
        "Hold"
    }
}
