//! Mode Manager
//!
//! Owns the active mode and runs the transition protocol once per
//! superloop cycle:
//!
//! 1. Drain the pending-transition mailbox (pilot switch, API, or the
//!    launch timer all post there).
//! 2. Apply the safety fallback policy for AUTO.
//! 3. Update the active mode with the elapsed time.
//!
//! Transitions tear the outgoing mode down (`exit`), then initialize
//! the incoming one (`enter`). A refused `enter` re-enters the previous
//! mode, so the aircraft never flies without an active mode. Requesting
//! the currently-active mode re-initializes it; that is not an error.
//!
//! ## Safety fallback
//!
//! While AUTO is active, a bad position solution forces HOLD and a bad
//! attitude solution forces DIRECT, checked before the mode update runs.
//! Entry into AUTO is refused under the same conditions, so the policy
//! is deterministic in both directions.

use super::mode::{Mode, PlaneMode};
use super::PlaneContext;
use skylark_core::mode::{FlightMode, ModeRequest};

/// Assumed period of the very first cycle (50 Hz superloop).
const FIRST_CYCLE_DT: f32 = 0.02;

/// Flight-mode state machine driver.
pub struct ModeManager {
    current: PlaneMode,
    last_update_us: u64,
}

impl ModeManager {
    /// Enter the initial mode. Fails if that mode refuses entry.
    pub fn new(initial: ModeRequest, ctx: &mut PlaneContext) -> Result<Self, &'static str> {
        let mut current = PlaneMode::from_request(initial, ctx.params);
        current.enter(ctx)?;
        ctx.vehicle.set_mode(current.reported_mode());

        Ok(Self {
            current,
            last_update_us: 0,
        })
    }

    /// Name of the active mode ("Launch" while the wrapper is active).
    pub fn current_mode_name(&self) -> &'static str {
        self.current.name()
    }

    /// Run one superloop cycle.
    pub fn update(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        if let Some(request) = ctx.pending.take() {
            if let Err(_e) = self.change_to(request, ctx) {
                crate::log_warn!("Transition to {} refused: {}", request.as_str(), _e);
            }
        }

        self.apply_safety_fallback(ctx);

        let dt = if self.last_update_us == 0 {
            FIRST_CYCLE_DT
        } else {
            ctx.now_us.saturating_sub(self.last_update_us) as f32 / 1_000_000.0
        };
        self.last_update_us = ctx.now_us;

        self.current.update(ctx, dt)
    }

    /// Perform a mode transition immediately.
    pub fn change_to(
        &mut self,
        request: ModeRequest,
        ctx: &mut PlaneContext,
    ) -> Result<(), &'static str> {
        crate::log_info!(
            "Mode transition: {} -> {}",
            self.current.name(),
            request.as_str()
        );

        if let Err(_e) = self.current.exit(ctx) {
            crate::log_warn!("Mode exit error ({}): {}", self.current.name(), _e);
        }

        let mut next = PlaneMode::from_request(request, ctx.params);
        match next.enter(ctx) {
            Ok(()) => {
                self.current = next;
                ctx.vehicle.set_mode(self.current.reported_mode());
                Ok(())
            }
            Err(e) => {
                crate::log_error!("Failed to enter {}: {}", next.name(), e);

                // Fall back to the mode we just left.
                if let Err(_e2) = self.current.enter(ctx) {
                    crate::log_error!(
                        "Failed to re-enter {}: {}",
                        self.current.name(),
                        _e2
                    );
                }
                Err(e)
            }
        }
    }

    fn apply_safety_fallback(&mut self, ctx: &mut PlaneContext) {
        if !matches!(self.current, PlaneMode::Auto(_)) {
            return;
        }

        let fallback = if !ctx.vehicle.ahrs_safe() {
            Some(FlightMode::Direct)
        } else if !ctx.vehicle.gps_safe() {
            Some(FlightMode::Hold)
        } else {
            None
        };

        if let Some(mode) = fallback {
            crate::log_warn!("Auto unsafe, falling back to {}", mode.as_str());
            if let Err(_e) = self.change_to(ModeRequest::Mode(mode), ctx) {
                crate::log_error!("Safety fallback failed: {}", _e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockVehicle;
    use skylark_core::nav::geo::offset_position;

    fn manager_in(request: ModeRequest, vehicle: &mut MockVehicle) -> ModeManager {
        let mut ctx = vehicle.context();
        ModeManager::new(request, &mut ctx).expect("initial mode must enter")
    }

    #[test]
    fn test_re_entering_active_mode_is_fine() {
        let mut vehicle = MockVehicle::new();
        let mut manager = manager_in(ModeRequest::Mode(FlightMode::Hold), &mut vehicle);

        vehicle.pending.request(ModeRequest::Mode(FlightMode::Hold));
        vehicle.step(&mut manager).unwrap();
        vehicle.pending.request(ModeRequest::Mode(FlightMode::Hold));
        vehicle.step(&mut manager).unwrap();

        assert_eq!(manager.current_mode_name(), "Hold");
        assert_eq!(vehicle.state.mode(), FlightMode::Hold);
    }

    #[test]
    fn test_refused_entry_keeps_previous_mode() {
        let mut vehicle = MockVehicle::new();
        let mut manager = manager_in(ModeRequest::Mode(FlightMode::Normal), &mut vehicle);

        // Auto with an empty flight plan refuses to enter.
        vehicle.pending.request(ModeRequest::Mode(FlightMode::Auto));
        vehicle.step(&mut manager).unwrap();

        assert_eq!(manager.current_mode_name(), "Normal");
        assert_eq!(vehicle.state.mode(), FlightMode::Normal);
    }

    #[test]
    fn test_gps_loss_falls_back_to_hold() {
        let mut vehicle = MockVehicle::new();
        let (lat, lon) = offset_position(vehicle.position.lat, vehicle.position.lon, 90.0, 800.0);
        vehicle
            .plan
            .push(skylark_core::mission::Waypoint::at(lat, lon))
            .unwrap();

        let mut manager = manager_in(ModeRequest::Mode(FlightMode::Auto), &mut vehicle);
        vehicle.run_cycles(&mut manager, 3);
        assert_eq!(manager.current_mode_name(), "Auto");

        vehicle.state.set_gps_safe(false);
        vehicle.step(&mut manager).unwrap();

        assert_eq!(manager.current_mode_name(), "Hold");
        assert_eq!(vehicle.state.mode(), FlightMode::Hold);
    }

    #[test]
    fn test_ahrs_loss_falls_back_to_direct() {
        let mut vehicle = MockVehicle::new();
        let (lat, lon) = offset_position(vehicle.position.lat, vehicle.position.lon, 0.0, 800.0);
        vehicle
            .plan
            .push(skylark_core::mission::Waypoint::at(lat, lon))
            .unwrap();

        let mut manager = manager_in(ModeRequest::Mode(FlightMode::Auto), &mut vehicle);
        vehicle.run_cycles(&mut manager, 1);

        vehicle.state.set_ahrs_safe(false);
        vehicle.step(&mut manager).unwrap();

        assert_eq!(manager.current_mode_name(), "Direct");
    }

    #[test]
    fn test_pending_request_applies_next_cycle() {
        let mut vehicle = MockVehicle::new();
        let mut manager = manager_in(ModeRequest::Mode(FlightMode::Direct), &mut vehicle);

        vehicle.pending.request(ModeRequest::Mode(FlightMode::Normal));
        vehicle.step(&mut manager).unwrap();

        assert_eq!(manager.current_mode_name(), "Normal");
    }
}
