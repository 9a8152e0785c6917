//! Attitude-hold inner loop
//!
//! The shared inner loop used by NORMAL, LAUNCH, TUNE, HOLD, and AUTO:
//! tracks a roll/pitch target with one PID per axis and converts the
//! axis commands into elevon servo angles. A flying wing has no yaw
//! effector, so the yaw component of the target is recorded but drives
//! nothing.
//!
//! Outer loops (rate mixer, waypoint guidance) write the target; this
//! loop runs once per cycle against the current attitude snapshot.

use skylark_core::actuator::ActuatorInterface;
use skylark_core::ahrs::AttitudeSnapshot;
use skylark_core::mixing::{mix_elevon, ElevonConfig, Side};
use skylark_core::parameters::ControlParams;
use skylark_core::pid::PidController;

/// Attitude setpoint in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttitudeTarget {
    pub roll_deg: f32,
    pub pitch_deg: f32,
    pub yaw_deg: f32,
}

/// The attitude-hold inner loop.
pub struct AttitudeHold {
    roll_pid: PidController,
    pitch_pid: PidController,
    elevon: ElevonConfig,
    target: AttitudeTarget,
    ready: bool,
}

impl AttitudeHold {
    /// Build the inner loop from the control parameter block.
    pub fn new(params: &ControlParams) -> Self {
        Self {
            roll_pid: PidController::new(params.attitude.to_roll_pid()),
            pitch_pid: PidController::new(params.attitude.to_pitch_pid()),
            elevon: params.to_elevon_config(),
            target: AttitudeTarget::default(),
            ready: false,
        }
    }

    /// Initialize for a new owner mode: validate tuning, zero the PID
    /// state, level the target. Modes refuse to enter when this fails.
    pub fn init(&mut self) -> Result<(), &'static str> {
        if !self.roll_pid.config().is_valid() || !self.pitch_pid.config().is_valid() {
            return Err("attitude-hold tuning invalid");
        }
        if self.elevon.gain <= 0.0 {
            return Err("elevon mixing gain must be positive");
        }

        self.roll_pid.init();
        self.pitch_pid.init();
        self.target = AttitudeTarget::default();
        self.ready = true;
        Ok(())
    }

    /// Zero the PID state on mode teardown. The loop stays initialized.
    pub fn reset(&mut self) {
        self.roll_pid.init();
        self.pitch_pid.init();
    }

    /// Replace the attitude setpoint.
    pub fn set_target(&mut self, roll_deg: f32, pitch_deg: f32, yaw_deg: f32) {
        self.target = AttitudeTarget {
            roll_deg,
            pitch_deg,
            yaw_deg,
        };
    }

    pub fn target(&self) -> AttitudeTarget {
        self.target
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Run one inner-loop cycle and command the elevons.
    pub fn update(
        &mut self,
        attitude: &AttitudeSnapshot,
        actuators: &mut dyn ActuatorInterface,
        now_us: u64,
    ) -> Result<(), &'static str> {
        if !self.ready {
            return Err("attitude hold not initialized");
        }

        let roll_cmd = self.roll_pid.update(
            f64::from(self.target.roll_deg),
            f64::from(attitude.roll_deg),
            now_us,
        ) as f32;
        let pitch_cmd = self.pitch_pid.update(
            f64::from(self.target.pitch_deg),
            f64::from(attitude.pitch_deg),
            now_us,
        ) as f32;

        let left = mix_elevon(Side::Left, roll_cmd, pitch_cmd, &self.elevon).clamp(0.0, 180.0);
        let right = mix_elevon(Side::Right, roll_cmd, pitch_cmd, &self.elevon).clamp(0.0, 180.0);

        actuators.set_elevons(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockActuators;
    use skylark_core::mixing::ELEVON_CENTER_DEG;

    fn ready_hold() -> AttitudeHold {
        let mut hold = AttitudeHold::new(&ControlParams::default());
        hold.init().unwrap();
        hold
    }

    #[test]
    fn test_update_requires_init() {
        let mut hold = AttitudeHold::new(&ControlParams::default());
        let mut actuators = MockActuators::new();

        assert!(hold
            .update(&AttitudeSnapshot::level(), &mut actuators, 20_000)
            .is_err());

        hold.init().unwrap();
        assert!(hold
            .update(&AttitudeSnapshot::level(), &mut actuators, 20_000)
            .is_ok());
    }

    #[test]
    fn test_level_on_target_is_neutral() {
        let mut hold = ready_hold();
        let mut actuators = MockActuators::new();

        hold.update(&AttitudeSnapshot::level(), &mut actuators, 20_000)
            .unwrap();
        assert!((actuators.left_deg - ELEVON_CENTER_DEG).abs() < 0.5);
        assert!((actuators.right_deg - ELEVON_CENTER_DEG).abs() < 0.5);
    }

    #[test]
    fn test_roll_error_deflects_differentially() {
        let mut hold = ready_hold();
        let mut actuators = MockActuators::new();

        // Right wing down, level target: both surfaces move the same way
        // on the roll component.
        let banked = AttitudeSnapshot {
            roll_deg: 20.0,
            ..AttitudeSnapshot::level()
        };
        hold.update(&banked, &mut actuators, 20_000).unwrap();

        let left_off = actuators.left_deg - ELEVON_CENTER_DEG;
        let right_off = actuators.right_deg - ELEVON_CENTER_DEG;
        assert!(left_off < 0.0, "left {left_off}");
        assert!(right_off < 0.0, "right {right_off}");
    }

    #[test]
    fn test_pitch_error_deflects_symmetrically() {
        let mut hold = ready_hold();
        let mut actuators = MockActuators::new();

        hold.set_target(0.0, 10.0, 0.0);
        hold.update(&AttitudeSnapshot::level(), &mut actuators, 20_000)
            .unwrap();

        let left_off = actuators.left_deg - ELEVON_CENTER_DEG;
        let right_off = actuators.right_deg - ELEVON_CENTER_DEG;
        assert!(left_off > 0.0, "left {left_off}");
        assert!(right_off < 0.0, "right {right_off}");
        assert!((left_off + right_off).abs() < 1e-3, "pure pitch is antisymmetric");
    }

    #[test]
    fn test_init_levels_target() {
        let mut hold = ready_hold();
        hold.set_target(10.0, 20.0, 30.0);
        hold.init().unwrap();
        assert_eq!(hold.target(), AttitudeTarget::default());
    }
}
