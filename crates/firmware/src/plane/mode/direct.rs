//! Direct Mode
//!
//! Pilot pass-through with no stabilization: sticks go straight through
//! the elevon mixer to the servos. Fail-safe to neutral when the
//! receiver times out.

use super::{Mode, PlaneContext};
use skylark_core::mixing::{mix_elevon, ElevonConfig, Side};
use skylark_core::parameters::{ControlParams, ParameterStore};

/// Direct pass-through mode.
pub struct DirectMode {
    elevon: ElevonConfig,
}

impl DirectMode {
    pub fn new(params: &ParameterStore) -> Self {
        Self {
            elevon: ControlParams::from_store(params).to_elevon_config(),
        }
    }
}

impl Mode for DirectMode {
    fn enter(&mut self, _ctx: &mut PlaneContext) -> Result<(), &'static str> {
        crate::log_info!("Entering Direct mode");
        Ok(())
    }

    fn update(&mut self, ctx: &mut PlaneContext, _dt: f32) -> Result<(), &'static str> {
        if ctx.pilot.is_lost(ctx.now_us) {
            return ctx.actuators.neutral();
        }

        let left = mix_elevon(Side::Left, ctx.pilot.roll_deg, ctx.pilot.pitch_deg, &self.elevon)
            .clamp(0.0, 180.0);
        let right = mix_elevon(Side::Right, ctx.pilot.roll_deg, ctx.pilot.pitch_deg, &self.elevon)
            .clamp(0.0, 180.0);

        ctx.actuators.set_elevons(left, right)?;
        ctx.actuators.set_throttle(ctx.pilot.throttle)
    }

    fn exit(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        ctx.actuators.neutral()
    }

    fn name(&self) -> &'static str {
        "Direct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockVehicle;

    #[test]
    fn test_sticks_pass_through() {
        let mut vehicle = MockVehicle::new();
        let mut mode = DirectMode::new(&vehicle.params);
        vehicle
            .pilot
            .set_sticks(30.0, 0.0, 0.6, vehicle.now_us());

        let mut ctx = vehicle.context();
        mode.enter(&mut ctx).unwrap();
        mode.update(&mut ctx, 0.02).unwrap();

        // Pure roll moves both surfaces the same way.
        assert_eq!(vehicle.actuators.left_deg, 120.0);
        assert_eq!(vehicle.actuators.right_deg, 120.0);
        assert_eq!(vehicle.actuators.throttle, 0.6);
    }

    #[test]
    fn test_rc_loss_goes_neutral() {
        let mut vehicle = MockVehicle::new();
        let mut mode = DirectMode::new(&vehicle.params);
        vehicle
            .pilot
            .set_sticks(45.0, 10.0, 0.8, vehicle.now_us());

        // No receiver frame for two seconds.
        vehicle.time.advance(2_000_000);

        let mut ctx = vehicle.context();
        mode.enter(&mut ctx).unwrap();
        mode.update(&mut ctx, 0.02).unwrap();

        assert_eq!(vehicle.actuators.left_deg, 90.0);
        assert_eq!(vehicle.actuators.right_deg, 90.0);
        assert_eq!(vehicle.actuators.throttle, 0.0);
    }

    #[test]
    fn test_exit_neutralizes() {
        let mut vehicle = MockVehicle::new();
        let mut mode = DirectMode::new(&vehicle.params);
        vehicle
            .pilot
            .set_sticks(20.0, 20.0, 1.0, vehicle.now_us());

        let mut ctx = vehicle.context();
        mode.enter(&mut ctx).unwrap();
        mode.update(&mut ctx, 0.02).unwrap();
        mode.exit(&mut ctx).unwrap();

        assert_eq!(vehicle.actuators.left_deg, 90.0);
        assert_eq!(vehicle.actuators.throttle, 0.0);
    }
}
