//! Normal Mode
//!
//! Rate-commanded attitude hold. Stick deflection commands an attitude
//! rate; the rate mixer integrates it into a running setpoint which the
//! shared inner loop then tracks. Centered sticks therefore hold the
//! current attitude.

use super::{Mode, PlaneContext};
use skylark_core::mixing::{Axis, RateMixer};
use skylark_core::parameters::{ControlParams, ParameterStore};

/// Attitude setpoint excursion limits (degrees).
const MAX_TARGET_ROLL_DEG: f32 = 60.0;
const MAX_TARGET_PITCH_DEG: f32 = 45.0;

/// Rate-commanded attitude mode.
pub struct NormalMode {
    mixer: RateMixer,
    target_roll_deg: f32,
    target_pitch_deg: f32,
}

impl NormalMode {
    pub fn new(params: &ParameterStore) -> Self {
        Self {
            mixer: RateMixer::new(ControlParams::from_store(params).to_rate_config()),
            target_roll_deg: 0.0,
            target_pitch_deg: 0.0,
        }
    }
}

impl Mode for NormalMode {
    fn enter(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        ctx.attitude_hold.init()?;
        self.mixer.reset();

        // Start from the current attitude so engagement is bumpless.
        self.target_roll_deg = ctx.attitude.roll_deg;
        self.target_pitch_deg = ctx.attitude.pitch_deg;
        ctx.attitude_hold
            .set_target(self.target_roll_deg, self.target_pitch_deg, 0.0);

        crate::log_info!("Entering Normal mode");
        Ok(())
    }

    fn update(&mut self, ctx: &mut PlaneContext, _dt: f32) -> Result<(), &'static str> {
        // A lost receiver means centered sticks: hold the last setpoint.
        let (roll_stick, pitch_stick, throttle) = if ctx.pilot.is_lost(ctx.now_us) {
            (0.0, 0.0, 0.0)
        } else {
            (ctx.pilot.roll_deg, ctx.pilot.pitch_deg, ctx.pilot.throttle)
        };

        self.target_roll_deg = (self.target_roll_deg
            + self
                .mixer
                .calc_adjust(Axis::Roll, roll_stick, pitch_stick, ctx.now_us))
        .clamp(-MAX_TARGET_ROLL_DEG, MAX_TARGET_ROLL_DEG);
        self.target_pitch_deg = (self.target_pitch_deg
            + self
                .mixer
                .calc_adjust(Axis::Pitch, roll_stick, pitch_stick, ctx.now_us))
        .clamp(-MAX_TARGET_PITCH_DEG, MAX_TARGET_PITCH_DEG);

        ctx.attitude_hold
            .set_target(self.target_roll_deg, self.target_pitch_deg, 0.0);
        ctx.attitude_hold
            .update(&ctx.attitude, ctx.actuators, ctx.now_us)?;

        ctx.actuators.set_throttle(throttle)
    }

    fn exit(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        self.mixer.reset();
        ctx.attitude_hold.reset();
        ctx.actuators.neutral()
    }

    fn name(&self) -> &'static str {
        "Normal"
    }
}
