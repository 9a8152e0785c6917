//! Pilot stick input state
//!
//! The receiver collaborator decodes channels and pushes them in here;
//! modes read the latest sticks. Stick deflection is expressed in
//! commanded degrees over -90..90, which is the input range the rate
//! mixer maps onto per-axis rates.

/// Sticks older than this are considered lost (microseconds).
pub const RC_TIMEOUT_US: u64 = 1_000_000;

/// Deflection below this is treated as a centered stick (degrees).
pub const STICK_DEADBAND_DEG: f32 = 5.0;

/// Latest pilot commands.
#[derive(Debug, Clone, Copy)]
pub struct PilotInput {
    /// Roll stick in commanded degrees, -90..90
    pub roll_deg: f32,
    /// Pitch stick in commanded degrees, -90..90
    pub pitch_deg: f32,
    /// Throttle stick, 0..1
    pub throttle: f32,
    /// Time of the last receiver frame (microseconds)
    pub last_frame_us: u64,
}

impl PilotInput {
    /// Centered sticks stamped at `now_us`.
    pub fn centered(now_us: u64) -> Self {
        Self {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            throttle: 0.0,
            last_frame_us: now_us,
        }
    }

    /// Record a fresh receiver frame.
    pub fn set_sticks(&mut self, roll_deg: f32, pitch_deg: f32, throttle: f32, now_us: u64) {
        self.roll_deg = roll_deg.clamp(-90.0, 90.0);
        self.pitch_deg = pitch_deg.clamp(-90.0, 90.0);
        self.throttle = throttle.clamp(0.0, 1.0);
        self.last_frame_us = now_us;
    }

    /// True when no frame has arrived within the timeout.
    pub fn is_lost(&self, now_us: u64) -> bool {
        now_us.saturating_sub(self.last_frame_us) > RC_TIMEOUT_US
    }

    /// True while either attitude stick is deflected past the deadband.
    /// Launch uses the rising edge of this to hand control back.
    pub fn has_attitude_input(&self) -> bool {
        self.roll_deg.abs() > STICK_DEADBAND_DEG || self.pitch_deg.abs() > STICK_DEADBAND_DEG
    }
}

impl Default for PilotInput {
    fn default() -> Self {
        Self::centered(0)
    }
}

/// Map a receiver pulse width (microseconds) onto -90..90 commanded
/// degrees, 1500 us centered.
pub fn pulse_to_command_deg(pulse_us: u16) -> f32 {
    let clamped = pulse_us.clamp(1000, 2000);
    (clamped as f32 - 1500.0) / 500.0 * 90.0
}

/// Map a receiver pulse width onto 0..1 throttle.
pub fn pulse_to_throttle(pulse_us: u16) -> f32 {
    let clamped = pulse_us.clamp(1000, 2000);
    (clamped as f32 - 1000.0) / 1000.0
}
