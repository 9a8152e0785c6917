//! Plane vehicle implementation
//!
//! The flying-wing vehicle built on skylark_core: per-mode control
//! logic, the mode manager, and the per-cycle [`PlaneContext`] that
//! carries every collaborator a mode may touch.
//!
//! There is deliberately no global state here. The superloop owns the
//! collaborators, builds a `PlaneContext` each iteration, and hands it
//! to [`mode_manager::ModeManager::update`].

pub mod mode;
pub mod mode_manager;

pub use mode_manager::ModeManager;

use crate::subsystems::AttitudeHold;
use skylark_core::actuator::ActuatorInterface;
use skylark_core::ahrs::{AttitudeSnapshot, PositionFix};
use skylark_core::mission::FlightPlan;
use skylark_core::mode::{PendingTransition, VehicleState};
use skylark_core::parameters::ParameterStore;
use skylark_core::rc::PilotInput;
use skylark_core::scheduler::TimerService;

use mode::tune::Autotuner;

/// Everything a mode may read or command during one superloop cycle.
///
/// Snapshots (`attitude`, `position`, `pilot`, `now_us`) are refreshed
/// by the superloop before each update; the references point at the
/// long-lived collaborators owned outside the mode machine.
pub struct PlaneContext<'a> {
    /// Latest attitude sample from the AAHRS collaborator
    pub attitude: AttitudeSnapshot,
    /// Latest position sample from the GPS collaborator
    pub position: PositionFix,
    /// Latest pilot sticks from the receiver collaborator
    pub pilot: PilotInput,
    /// Wall clock for this cycle (microseconds)
    pub now_us: u64,
    /// Actuator sink (elevons, throttle, bay servo)
    pub actuators: &'a mut dyn ActuatorInterface,
    /// Shared attitude-hold inner loop
    pub attitude_hold: &'a mut AttitudeHold,
    /// Deferred-transition timer service
    pub timer: &'a mut dyn TimerService,
    /// Flight-plan provider for AUTO
    pub plan: &'a mut dyn FlightPlan,
    /// Configuration store, read at mode-init time
    pub params: &'a ParameterStore,
    /// Transition mailbox drained by the mode manager
    pub pending: &'a PendingTransition,
    /// Shared mode/safety state
    pub vehicle: &'a VehicleState,
    /// External autotuner, required by TUNE
    pub tuner: Option<&'a mut dyn Autotuner>,
}
