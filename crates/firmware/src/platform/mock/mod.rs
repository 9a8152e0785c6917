//! Mock platform services
//!
//! Deterministic stand-ins for the hardware collaborators:
//! [`MockActuators`] records commanded outputs (with optional fault
//! injection), [`SweepAutotuner`] produces a square-wave excitation for
//! TUNE, and [`MockVehicle`] bundles every collaborator plus the input
//! snapshots into one harness that can mint a [`PlaneContext`] per
//! cycle.

use crate::plane::mode::tune::{Autotuner, TuneCommand};
use crate::plane::{ModeManager, PlaneContext};
use crate::subsystems::AttitudeHold;
use skylark_core::actuator::ActuatorInterface;
use skylark_core::ahrs::{AttitudeSnapshot, PositionFix};
use skylark_core::mission::WaypointQueue;
use skylark_core::mixing::Axis;
use skylark_core::mode::{PendingTransition, VehicleState};
use skylark_core::parameters::{self, ControlParams, ParameterStore};
use skylark_core::rc::PilotInput;
use skylark_core::scheduler::MockTimerService;
use skylark_core::traits::{MockTime, TimeSource};

/// Records the last commanded actuator targets.
#[derive(Debug)]
pub struct MockActuators {
    pub left_deg: f32,
    pub right_deg: f32,
    pub throttle: f32,
    pub bay_deg: f32,
    /// Fault injection: fail the next elevon command
    pub fail_elevons: bool,
    /// Fault injection: fail the next throttle command
    pub fail_throttle: bool,
}

impl MockActuators {
    pub fn new() -> Self {
        Self {
            left_deg: 90.0,
            right_deg: 90.0,
            throttle: 0.0,
            bay_deg: 90.0,
            fail_elevons: false,
            fail_throttle: false,
        }
    }
}

impl Default for MockActuators {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorInterface for MockActuators {
    fn set_elevons(&mut self, left_deg: f32, right_deg: f32) -> Result<(), &'static str> {
        if self.fail_elevons {
            return Err("mock elevon fault");
        }
        self.left_deg = left_deg;
        self.right_deg = right_deg;
        Ok(())
    }

    fn set_throttle(&mut self, normalized: f32) -> Result<(), &'static str> {
        if self.fail_throttle {
            return Err("mock throttle fault");
        }
        self.throttle = normalized.clamp(0.0, 1.0);
        Ok(())
    }

    fn set_bay(&mut self, angle_deg: f32) -> Result<(), &'static str> {
        self.bay_deg = angle_deg.clamp(0.0, 180.0);
        Ok(())
    }
}

/// Square-wave excitation source for TUNE.
#[derive(Debug)]
pub struct SweepAutotuner {
    axis: Axis,
    amplitude_deg: f32,
    period_s: f32,
    elapsed_s: f32,
}

impl SweepAutotuner {
    pub fn new(axis: Axis, amplitude_deg: f32, period_s: f32) -> Self {
        Self {
            axis,
            amplitude_deg,
            period_s,
            elapsed_s: 0.0,
        }
    }
}

impl Autotuner for SweepAutotuner {
    fn axis(&self) -> Axis {
        self.axis
    }

    fn step(&mut self, _attitude: &AttitudeSnapshot, dt: f32) -> TuneCommand {
        self.elapsed_s += dt;
        let phase = self.elapsed_s % self.period_s;
        let setpoint_deg = if phase < self.period_s / 2.0 {
            self.amplitude_deg
        } else {
            -self.amplitude_deg
        };
        TuneCommand { setpoint_deg }
    }
}

/// Whole-vehicle test harness.
///
/// Owns every collaborator a mode can touch plus the per-cycle input
/// snapshots. `step()` advances the clock one 50 Hz cycle, fires due
/// timers, and runs the mode manager.
pub struct MockVehicle {
    pub actuators: MockActuators,
    pub attitude_hold: AttitudeHold,
    pub timer: MockTimerService,
    pub plan: WaypointQueue,
    pub params: ParameterStore,
    pub pending: PendingTransition,
    pub state: VehicleState,
    pub time: MockTime,
    pub attitude: AttitudeSnapshot,
    pub position: PositionFix,
    pub pilot: PilotInput,
    pub tuner: Option<SweepAutotuner>,
    /// While true, `step()` keeps stamping fresh receiver frames.
    pub rc_connected: bool,
}

impl MockVehicle {
    /// Healthy vehicle, level at 100 m, both sensor feeds safe, clock
    /// started away from zero.
    pub fn new() -> Self {
        let mut params = ParameterStore::new();
        parameters::register_all_defaults(&mut params).expect("default parameters fit the store");

        let state = VehicleState::new();
        state.set_ahrs_safe(true);
        state.set_gps_safe(true);

        let time = MockTime::with_initial(1_000_000);
        let pilot = PilotInput::centered(time.now_us());

        Self {
            actuators: MockActuators::new(),
            attitude_hold: AttitudeHold::new(&ControlParams::from_store(&params)),
            timer: MockTimerService::new(),
            plan: WaypointQueue::new(),
            params,
            pending: PendingTransition::new(),
            state,
            time,
            attitude: AttitudeSnapshot::level(),
            position: PositionFix::new(35.0, 139.0, 100.0),
            pilot,
            tuner: None,
            rc_connected: true,
        }
    }

    /// Current mock clock in microseconds.
    pub fn now_us(&self) -> u64 {
        self.time.now_us()
    }

    /// Build the context for the current cycle.
    pub fn context(&mut self) -> PlaneContext<'_> {
        PlaneContext {
            attitude: self.attitude,
            position: self.position,
            pilot: self.pilot,
            now_us: self.time.now_us(),
            actuators: &mut self.actuators,
            attitude_hold: &mut self.attitude_hold,
            timer: &mut self.timer,
            plan: &mut self.plan,
            params: &self.params,
            pending: &self.pending,
            vehicle: &self.state,
            tuner: self
                .tuner
                .as_mut()
                .map(|tuner| tuner as &mut dyn Autotuner),
        }
    }

    /// Advance one 50 Hz cycle and run the mode manager.
    pub fn step(&mut self, manager: &mut ModeManager) -> Result<(), &'static str> {
        self.time.advance(20_000);
        if self.rc_connected {
            self.pilot.last_frame_us = self.time.now_us();
        }
        self.timer.tick(self.time.now_ms(), &self.pending);

        let mut ctx = self.context();
        manager.update(&mut ctx)
    }

    /// Run `n` cycles, asserting each succeeds.
    pub fn run_cycles(&mut self, manager: &mut ModeManager, n: usize) {
        for _ in 0..n {
            self.step(manager).expect("cycle failed");
        }
    }
}

impl Default for MockVehicle {
    fn default() -> Self {
        Self::new()
    }
}
