//! Tune Mode
//!
//! Drives an external autotuner collaborator against a single axis: the
//! tuner produces attitude setpoints, we feed them to the inner loop and
//! the tuner watches the response through the attitude snapshots it is
//! given. The identification algorithm itself is out of scope here.

use super::{Mode, PlaneContext};
use skylark_core::ahrs::AttitudeSnapshot;
use skylark_core::mixing::Axis;

/// Setpoint produced by one autotuner step.
#[derive(Debug, Clone, Copy)]
pub struct TuneCommand {
    /// Attitude setpoint for the tuned axis (degrees)
    pub setpoint_deg: f32,
}

/// External autotuner collaborator.
pub trait Autotuner {
    /// Axis under test.
    fn axis(&self) -> Axis;

    /// Advance the excitation sequence by one cycle.
    fn step(&mut self, attitude: &AttitudeSnapshot, dt: f32) -> TuneCommand;
}

/// Single-axis autotune mode.
#[derive(Default)]
pub struct TuneMode;

impl TuneMode {
    pub fn new() -> Self {
        Self
    }
}

impl Mode for TuneMode {
    fn enter(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        if ctx.tuner.is_none() {
            return Err("no autotuner attached");
        }
        ctx.attitude_hold.init()?;
        ctx.attitude_hold.set_target(0.0, 0.0, 0.0);
        crate::log_info!("Entering Tune mode");
        Ok(())
    }

    fn update(&mut self, ctx: &mut PlaneContext, dt: f32) -> Result<(), &'static str> {
        let tuner = ctx.tuner.as_mut().ok_or("no autotuner attached")?;
        let command = tuner.step(&ctx.attitude, dt);

        match tuner.axis() {
            Axis::Roll => ctx.attitude_hold.set_target(command.setpoint_deg, 0.0, 0.0),
            Axis::Pitch => ctx.attitude_hold.set_target(0.0, command.setpoint_deg, 0.0),
        }

        ctx.attitude_hold
            .update(&ctx.attitude, ctx.actuators, ctx.now_us)?;
        ctx.actuators.set_throttle(ctx.pilot.throttle)
    }

    fn exit(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        ctx.attitude_hold.reset();
        ctx.actuators.neutral()
    }

    fn name(&self) -> &'static str {
        "Tune"
    }
}
