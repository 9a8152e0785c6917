//! Auto Mode
//!
//! Waypoint-following autonomous flight.
//!
//! # Behavior
//!
//! - On entry: refuse unless both attitude and position solutions are
//!   flagged safe and a leg is available; reset the guidance PIDs once.
//! - Each update: run the guidance loop against the current position and
//!   feed the commanded roll/pitch into the shared inner loop.
//! - On arrival: fire the registered callback, execute the leg's
//!   drop-bay command, advance through the flight-plan provider, or
//!   circle down onto the reached point when the plan is exhausted.
//!
//! Replacing the target via [`AutoMode::set`] never resets the guidance
//! PIDs, so control stays continuous across waypoint changes.

use super::{Mode, PlaneContext};
use skylark_core::actuator::{ActuatorInterface, BayPosition};
use skylark_core::mission::Waypoint;
use skylark_core::nav::GuidanceController;
use skylark_core::parameters::{BayParams, GuidanceParams, ParameterStore};

/// Invoked once when the active waypoint is reached, before advancing.
pub type ArrivalCallback = fn(&Waypoint);

/// Throttle used when a leg holds the current speed and none was set yet.
const DEFAULT_CRUISE_FRACTION: f32 = 0.7;

/// Waypoint guidance mode.
pub struct AutoMode {
    guidance: GuidanceController,
    bay: BayParams,
    cruise_speed: f32,
    throttle: f32,
    on_arrival: Option<ArrivalCallback>,
    holding_position: bool,
}

impl AutoMode {
    pub fn new(params: &ParameterStore) -> Self {
        let guidance_params = GuidanceParams::from_store(params);
        Self {
            guidance: GuidanceController::new(guidance_params.to_guidance_config()),
            bay: BayParams::from_store(params),
            cruise_speed: guidance_params.cruise_speed,
            throttle: DEFAULT_CRUISE_FRACTION,
            on_arrival: None,
            holding_position: false,
        }
    }

    /// Replace the active waypoint and arrival callback. The guidance
    /// PIDs keep their state.
    pub fn set(&mut self, waypoint: Waypoint, on_arrival: Option<ArrivalCallback>) {
        self.apply_leg(waypoint);
        self.on_arrival = on_arrival;
    }

    /// Command the drop bay to a detent. Independent of the PID loops.
    pub fn set_bay_position(
        &self,
        position: BayPosition,
        actuators: &mut dyn ActuatorInterface,
    ) -> Result<(), &'static str> {
        match self.bay.detent_for(position) {
            Some(angle) => actuators.set_bay(angle),
            None => Ok(()),
        }
    }

    /// True once the flight plan ran out and we are circling the last
    /// reached point.
    pub fn is_holding_position(&self) -> bool {
        self.holding_position
    }

    fn apply_leg(&mut self, waypoint: Waypoint) {
        if !waypoint.holds_speed() {
            self.throttle = (waypoint.speed / self.cruise_speed).clamp(0.0, 1.0);
        }
        self.guidance.set_waypoint(waypoint);
        self.holding_position = false;
    }

    fn arrive(&mut self, reached: Waypoint, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        if let Some(callback) = self.on_arrival.take() {
            callback(&reached);
        }
        if reached.commands_drop() {
            self.set_bay_position(BayPosition::Open, ctx.actuators)?;
        }

        match ctx.plan.next_waypoint() {
            Some(next) => {
                crate::log_info!("Auto: leg reached, advancing");
                self.apply_leg(next);
            }
            None => {
                crate::log_info!("Auto: flight plan complete, holding position");
                self.guidance
                    .set_waypoint(Waypoint::at(ctx.position.lat, ctx.position.lon));
                self.holding_position = true;
            }
        }
        Ok(())
    }
}

impl Mode for AutoMode {
    fn enter(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        if !ctx.vehicle.ahrs_safe() {
            return Err("Auto requires a safe attitude solution");
        }
        if !ctx.vehicle.gps_safe() {
            return Err("Auto requires a safe position solution");
        }

        ctx.attitude_hold.init()?;

        if self.guidance.target().is_none() {
            let first = ctx
                .plan
                .next_waypoint()
                .ok_or("Auto requires a flight plan")?;
            self.apply_leg(first);
        }
        self.guidance.reset();

        crate::log_info!("Entering Auto mode");
        Ok(())
    }

    fn update(&mut self, ctx: &mut PlaneContext, _dt: f32) -> Result<(), &'static str> {
        if !ctx.vehicle.gps_safe() {
            return Err("position solution lost in Auto");
        }
        if !ctx.vehicle.ahrs_safe() {
            return Err("attitude solution lost in Auto");
        }

        let output = self
            .guidance
            .update(
                ctx.position.lat,
                ctx.position.lon,
                ctx.position.alt_m,
                ctx.attitude.heading_deg(),
                ctx.now_us,
            )
            .ok_or("no active waypoint")?;

        ctx.attitude_hold
            .set_target(output.roll_cmd, output.pitch_cmd, 0.0);
        ctx.attitude_hold
            .update(&ctx.attitude, ctx.actuators, ctx.now_us)?;
        ctx.actuators.set_throttle(self.throttle)?;

        if output.at_waypoint && !self.holding_position {
            let reached = *self.guidance.target().ok_or("no active waypoint")?;
            self.arrive(reached, ctx)?;
        }

        Ok(())
    }

    fn exit(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        ctx.attitude_hold.reset();
        self.guidance.reset();
        ctx.actuators.neutral()
    }

    fn name(&self) -> &'static str {
        "Auto"
    }
}
