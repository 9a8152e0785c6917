//! Launch Mode
//!
//! Transitional hand-launch wrapper around a recorded follow-up mode.
//!
//! # Behavior
//!
//! - On entry: initialize the inner loop (failure refuses the
//!   transition), arm the throttle at idle, start awaiting the throw.
//! - While awaiting: the detector tracks the live pitch as the climb
//!   angle and watches for a single-axis acceleration spike.
//! - On detection: full climb throttle in the same cycle. A follow-up of
//!   AUTO schedules the one-shot deferred hand-off through the timer
//!   service; any other follow-up waits for the pilot to deflect a
//!   stick (rising edge, not level).
//! - While climbing: the inner loop tracks (0, climb angle, 0).
//!
//! The scheduled hand-off is cancelled in `exit()`, so switching away
//! mid-climb can never be overridden by a stale timer callback.

use super::{Mode, PlaneContext};
use skylark_core::launch::{LaunchConfig, LaunchDetector, LaunchStatus};
use skylark_core::mode::{FlightMode, ModeRequest};
use skylark_core::parameters::{LaunchParams, ParameterStore};
use skylark_core::scheduler::TimerHandle;

/// Hand-launch detection mode.
pub struct LaunchMode {
    detector: LaunchDetector,
    config: LaunchConfig,
    after: FlightMode,
    deferred: Option<TimerHandle>,
    pilot_was_centered: bool,
}

impl LaunchMode {
    pub fn new(after: FlightMode, params: &ParameterStore) -> Self {
        let config = LaunchParams::from_store(params).to_launch_config();
        Self {
            detector: LaunchDetector::new(config.accel_threshold_g),
            config,
            after,
            deferred: None,
            pilot_was_centered: true,
        }
    }

    /// The recorded follow-up mode.
    pub fn after(&self) -> FlightMode {
        self.after
    }

    fn on_launch_detected(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        crate::log_info!("Launch detected, climbing out");
        ctx.actuators.set_throttle(self.config.climb_throttle)?;

        if self.after == FlightMode::Auto {
            if ctx.vehicle.gps_safe() {
                let handle = ctx.timer.schedule_transition(
                    self.config.settle_delay_ms,
                    ModeRequest::Mode(FlightMode::Auto),
                )?;
                self.deferred = Some(handle);
            } else {
                // Deterministic degraded path: keep climbing until the
                // pilot takes over, same as a non-AUTO follow-up.
                crate::log_warn!("Launch: GPS unsafe, deferring to pilot hand-back");
            }
        }
        Ok(())
    }

    fn poll_pilot_hand_back(&mut self, ctx: &mut PlaneContext) {
        // Only the stick path hands back; a scheduled AUTO hand-off owns
        // the transition.
        if self.deferred.is_some() {
            return;
        }

        let deflected =
            !ctx.pilot.is_lost(ctx.now_us) && ctx.pilot.has_attitude_input();
        if deflected && self.pilot_was_centered {
            crate::log_info!("Launch: pilot input, handing back");
            ctx.pending.request(ModeRequest::Mode(self.after));
        }
        self.pilot_was_centered = !deflected;
    }
}

impl Mode for LaunchMode {
    fn enter(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        ctx.attitude_hold.init()?;
        ctx.actuators.set_throttle(self.config.idle_throttle)?;

        self.detector = LaunchDetector::new(self.config.accel_threshold_g);
        self.deferred = None;
        self.pilot_was_centered = !ctx.pilot.has_attitude_input();

        ctx.attitude_hold.set_target(0.0, ctx.attitude.pitch_deg, 0.0);

        crate::log_info!("Launch armed, awaiting throw");
        Ok(())
    }

    fn update(&mut self, ctx: &mut PlaneContext, _dt: f32) -> Result<(), &'static str> {
        match self.detector.status() {
            LaunchStatus::Awaiting => {
                if self.detector.update(ctx.attitude.pitch_deg, ctx.attitude.accel_g) {
                    self.on_launch_detected(ctx)?;
                }
            }
            LaunchStatus::Climbing => {
                ctx.actuators.set_throttle(self.config.climb_throttle)?;
                self.poll_pilot_hand_back(ctx);
            }
        }

        // Inner loop runs at (0, climb angle, 0) regardless of sub-state;
        // while awaiting, the climb angle is just the live pitch.
        ctx.attitude_hold
            .set_target(0.0, self.detector.climb_angle_deg(), 0.0);
        ctx.attitude_hold
            .update(&ctx.attitude, ctx.actuators, ctx.now_us)
    }

    fn exit(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        // Cancel-on-exit: a mode change away from the climb must kill the
        // deferred AUTO hand-off.
        if let Some(handle) = self.deferred.take() {
            ctx.timer.cancel(handle);
        }
        ctx.attitude_hold.reset();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Launch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockVehicle;
    use nalgebra::Vector3;

    fn spike(vehicle: &mut MockVehicle) {
        vehicle.attitude.accel_g = Vector3::new(2.0, 0.0, 1.0);
    }

    fn calm(vehicle: &mut MockVehicle) {
        vehicle.attitude.accel_g = Vector3::new(0.0, 0.0, 1.0);
    }

    #[test]
    fn test_arms_at_idle_throttle() {
        let mut vehicle = MockVehicle::new();
        let mut mode = LaunchMode::new(FlightMode::Auto, &vehicle.params);

        let mut ctx = vehicle.context();
        mode.enter(&mut ctx).unwrap();
        assert_eq!(vehicle.actuators.throttle, 0.15);
    }

    #[test]
    fn test_spike_commands_full_throttle_same_cycle() {
        let mut vehicle = MockVehicle::new();
        vehicle.attitude.pitch_deg = 9.0;
        let mut mode = LaunchMode::new(FlightMode::Auto, &vehicle.params);

        {
            let mut ctx = vehicle.context();
            mode.enter(&mut ctx).unwrap();
        }

        spike(&mut vehicle);
        {
            let mut ctx = vehicle.context();
            mode.update(&mut ctx, 0.02).unwrap();
        }

        assert_eq!(vehicle.actuators.throttle, 1.0);
        assert!(mode.detector.is_climbing());
        assert_eq!(mode.detector.climb_angle_deg(), 9.0);
        assert_eq!(vehicle.timer.armed(), 1, "AUTO hand-off scheduled");
    }

    #[test]
    fn test_climb_target_tracks_recorded_angle() {
        let mut vehicle = MockVehicle::new();
        vehicle.attitude.pitch_deg = 7.0;
        let mut mode = LaunchMode::new(FlightMode::Auto, &vehicle.params);

        {
            let mut ctx = vehicle.context();
            mode.enter(&mut ctx).unwrap();
        }
        spike(&mut vehicle);
        {
            let mut ctx = vehicle.context();
            mode.update(&mut ctx, 0.02).unwrap();
        }

        // Post-launch attitude changes must not move the climb target.
        vehicle.attitude.pitch_deg = -20.0;
        calm(&mut vehicle);
        vehicle.time.advance(20_000);
        {
            let mut ctx = vehicle.context();
            mode.update(&mut ctx, 0.02).unwrap();
        }

        let target = vehicle.attitude_hold.target();
        assert_eq!(target.roll_deg, 0.0);
        assert_eq!(target.pitch_deg, 7.0);
    }

    #[test]
    fn test_exit_cancels_deferred_hand_off() {
        let mut vehicle = MockVehicle::new();
        let mut mode = LaunchMode::new(FlightMode::Auto, &vehicle.params);

        {
            let mut ctx = vehicle.context();
            mode.enter(&mut ctx).unwrap();
        }
        spike(&mut vehicle);
        {
            let mut ctx = vehicle.context();
            mode.update(&mut ctx, 0.02).unwrap();
        }
        assert_eq!(vehicle.timer.armed(), 1);

        {
            let mut ctx = vehicle.context();
            mode.exit(&mut ctx).unwrap();
        }
        assert_eq!(vehicle.timer.armed(), 0, "stale hand-off cancelled");
    }

    #[test]
    fn test_gps_unsafe_skips_the_schedule() {
        let mut vehicle = MockVehicle::new();
        vehicle.state.set_gps_safe(false);
        let mut mode = LaunchMode::new(FlightMode::Auto, &vehicle.params);

        {
            let mut ctx = vehicle.context();
            mode.enter(&mut ctx).unwrap();
        }
        spike(&mut vehicle);
        {
            let mut ctx = vehicle.context();
            mode.update(&mut ctx, 0.02).unwrap();
        }

        assert_eq!(vehicle.timer.armed(), 0);
        assert_eq!(vehicle.actuators.throttle, 1.0, "still climbs");
    }

    #[test]
    fn test_pilot_edge_hands_back_non_auto_follow_up() {
        let mut vehicle = MockVehicle::new();
        let mut mode = LaunchMode::new(FlightMode::Normal, &vehicle.params);

        {
            let mut ctx = vehicle.context();
            mode.enter(&mut ctx).unwrap();
        }
        spike(&mut vehicle);
        {
            let mut ctx = vehicle.context();
            mode.update(&mut ctx, 0.02).unwrap();
        }
        assert_eq!(vehicle.timer.armed(), 0, "no timer for Normal follow-up");

        // Sticks centered: still ours.
        calm(&mut vehicle);
        vehicle.time.advance(20_000);
        vehicle.pilot.set_sticks(0.0, 0.0, 0.3, vehicle.now_us());
        {
            let mut ctx = vehicle.context();
            mode.update(&mut ctx, 0.02).unwrap();
        }
        assert_eq!(vehicle.pending.take(), None);

        // Stick deflection: rising edge requests the follow-up mode.
        vehicle.time.advance(20_000);
        vehicle.pilot.set_sticks(25.0, 0.0, 0.3, vehicle.now_us());
        {
            let mut ctx = vehicle.context();
            mode.update(&mut ctx, 0.02).unwrap();
        }
        assert_eq!(
            vehicle.pending.take(),
            Some(ModeRequest::Mode(FlightMode::Normal))
        );
    }

    #[test]
    fn test_enter_refused_on_throttle_fault() {
        let mut vehicle = MockVehicle::new();
        vehicle.actuators.fail_throttle = true;
        let mut mode = LaunchMode::new(FlightMode::Normal, &vehicle.params);

        let mut ctx = vehicle.context();
        assert!(mode.enter(&mut ctx).is_err());
    }
}
