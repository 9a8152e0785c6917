//! Axis-rate shaping and elevon mixing
//!
//! [`RateMixer`] turns pilot stick deflection into time-integrated
//! attitude-setpoint deltas, one wall-clock timestamp per axis.
//! [`mix_elevon`] combines roll and pitch components into a single
//! flying-wing servo angle centered at 90 degrees.

/// Controlled rotation axes of the rate loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Roll,
    Pitch,
}

/// Elevon servo side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Neutral elevon servo angle in degrees.
pub const ELEVON_CENTER_DEG: f32 = 90.0;

/// Stick deflection covers -90..90 degrees of commanded input.
const INPUT_RANGE_DEG: f32 = 90.0;

/// Per-axis maximum commanded rates.
#[derive(Debug, Clone, Copy)]
pub struct RateConfig {
    /// Full-deflection roll rate (deg/s)
    pub roll_max_dps: f32,
    /// Full-deflection pitch rate (deg/s)
    pub pitch_max_dps: f32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            roll_max_dps: 60.0,
            pitch_max_dps: 30.0,
        }
    }
}

/// Converts stick deflection into attitude-setpoint deltas.
///
/// Each axis integrates against its own last-call timestamp. `reset()`
/// must be invoked whenever the owning control loop is paused or a mode
/// switch occurs, so a stale delta is never applied.
#[derive(Debug)]
pub struct RateMixer {
    config: RateConfig,
    last_roll_us: Option<u64>,
    last_pitch_us: Option<u64>,
}

impl RateMixer {
    pub fn new(config: RateConfig) -> Self {
        Self {
            config,
            last_roll_us: None,
            last_pitch_us: None,
        }
    }

    /// Commanded rate for an axis given stick deflection in degrees
    /// (-90..90), mapped linearly onto the axis's configured maximum.
    pub fn dps(&self, axis: Axis, roll: f32, pitch: f32) -> f32 {
        match axis {
            Axis::Roll => roll / INPUT_RANGE_DEG * self.config.roll_max_dps,
            Axis::Pitch => pitch / INPUT_RANGE_DEG * self.config.pitch_max_dps,
        }
    }

    /// Setpoint delta in degrees for an axis: commanded rate times the
    /// wall-clock interval since that axis's previous call.
    ///
    /// The first call after `reset()` only records the timestamp and
    /// returns 0, so resuming a loop never applies a stale interval.
    pub fn calc_adjust(&mut self, axis: Axis, roll: f32, pitch: f32, now_us: u64) -> f32 {
        let last = match axis {
            Axis::Roll => &mut self.last_roll_us,
            Axis::Pitch => &mut self.last_pitch_us,
        };

        let dt = match *last {
            Some(prev) => now_us.saturating_sub(prev) as f32 / 1_000_000.0,
            None => 0.0,
        };
        *last = Some(now_us);

        self.dps(axis, roll, pitch) * dt
    }

    /// Forget both axes' timestamps.
    pub fn reset(&mut self) {
        self.last_roll_us = None;
        self.last_pitch_us = None;
    }

    pub fn config(&self) -> &RateConfig {
        &self.config
    }
}

/// Elevon mixing weights. Signs are +/-1 and let the airframe reverse
/// either component without rewiring.
#[derive(Debug, Clone, Copy)]
pub struct ElevonConfig {
    /// Overall mixing gain
    pub gain: f32,
    /// Roll component weight
    pub roll_bias: f32,
    /// Pitch component weight
    pub pitch_bias: f32,
    /// Roll direction (+1.0 or -1.0)
    pub roll_sign: f32,
    /// Pitch direction (+1.0 or -1.0)
    pub pitch_sign: f32,
}

impl Default for ElevonConfig {
    fn default() -> Self {
        Self {
            gain: 1.0,
            roll_bias: 1.0,
            pitch_bias: 1.0,
            roll_sign: 1.0,
            pitch_sign: 1.0,
        }
    }
}

/// Combine roll and pitch commands (degrees) into an elevon servo angle.
///
/// The left surface adds both components; the right surface subtracts
/// the pitch component. Range clamping is the actuator layer's job.
pub fn mix_elevon(side: Side, roll: f32, pitch: f32, config: &ElevonConfig) -> f32 {
    let roll_part = config.roll_sign * config.roll_bias * roll * config.gain;
    let pitch_part = config.pitch_sign * config.pitch_bias * pitch * config.gain;

    match side {
        Side::Left => ELEVON_CENTER_DEG + roll_part + pitch_part,
        Side::Right => ELEVON_CENTER_DEG + roll_part - pitch_part,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dps_linear_map() {
        let mixer = RateMixer::new(RateConfig::default());

        assert_eq!(mixer.dps(Axis::Roll, 90.0, 0.0), 60.0);
        assert_eq!(mixer.dps(Axis::Roll, -45.0, 0.0), -30.0);
        assert_eq!(mixer.dps(Axis::Pitch, 0.0, 90.0), 30.0);
        assert_eq!(mixer.dps(Axis::Pitch, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_first_adjust_after_reset_is_zero() {
        let mut mixer = RateMixer::new(RateConfig {
            roll_max_dps: 300.0,
            pitch_max_dps: 300.0,
        });

        assert_eq!(mixer.calc_adjust(Axis::Roll, 90.0, 90.0, 5_000_000), 0.0);
        assert_eq!(mixer.calc_adjust(Axis::Pitch, 90.0, 90.0, 5_000_000), 0.0);

        // And again after an explicit reset mid-run.
        mixer.calc_adjust(Axis::Roll, 90.0, 0.0, 5_020_000);
        mixer.reset();
        assert_eq!(mixer.calc_adjust(Axis::Roll, 90.0, 0.0, 9_000_000), 0.0);
    }

    #[test]
    fn test_adjust_integrates_rate_over_dt() {
        let mut mixer = RateMixer::new(RateConfig::default());

        mixer.calc_adjust(Axis::Roll, 90.0, 0.0, 1_000_000);
        // 20 ms at full deflection: 60 deg/s * 0.02 s.
        let adjust = mixer.calc_adjust(Axis::Roll, 90.0, 0.0, 1_020_000);
        assert!((adjust - 1.2).abs() < 1e-5, "got {adjust}");
    }

    #[test]
    fn test_axes_track_time_independently() {
        let mut mixer = RateMixer::new(RateConfig::default());

        mixer.calc_adjust(Axis::Roll, 90.0, 90.0, 1_000_000);
        mixer.calc_adjust(Axis::Pitch, 90.0, 90.0, 1_100_000);

        let roll = mixer.calc_adjust(Axis::Roll, 90.0, 90.0, 1_200_000);
        let pitch = mixer.calc_adjust(Axis::Pitch, 90.0, 90.0, 1_200_000);

        // Roll saw 200 ms, pitch only 100 ms.
        assert!((roll - 60.0 * 0.2).abs() < 1e-4);
        assert!((pitch - 30.0 * 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_elevon_sides_differ_by_twice_the_pitch() {
        let config = ElevonConfig::default();
        let left = mix_elevon(Side::Left, 90.0, 90.0, &config);
        let right = mix_elevon(Side::Right, 90.0, 90.0, &config);

        assert_eq!(left - right, 2.0 * 90.0);
    }

    #[test]
    fn test_elevon_neutral_at_zero_input() {
        let config = ElevonConfig::default();
        assert_eq!(mix_elevon(Side::Left, 0.0, 0.0, &config), ELEVON_CENTER_DEG);
        assert_eq!(mix_elevon(Side::Right, 0.0, 0.0, &config), ELEVON_CENTER_DEG);
    }

    #[test]
    fn test_elevon_sign_reversal() {
        let reversed = ElevonConfig {
            roll_sign: -1.0,
            ..ElevonConfig::default()
        };
        let normal = ElevonConfig::default();

        let a = mix_elevon(Side::Left, 30.0, 0.0, &normal);
        let b = mix_elevon(Side::Left, 30.0, 0.0, &reversed);
        assert_eq!(a - ELEVON_CENTER_DEG, -(b - ELEVON_CENTER_DEG));
    }

    #[test]
    fn test_elevon_gain_and_bias_scale() {
        let config = ElevonConfig {
            gain: 0.5,
            roll_bias: 0.8,
            pitch_bias: 0.6,
            ..ElevonConfig::default()
        };
        let left = mix_elevon(Side::Left, 10.0, 20.0, &config);
        assert!((left - (90.0 + 0.5 * 0.8 * 10.0 + 0.5 * 0.6 * 20.0)).abs() < 1e-5);
    }
}
