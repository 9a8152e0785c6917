//! Single-axis PID controller
//!
//! Closed-loop controller used by the attitude-hold inner loop and the
//! waypoint guidance loop. Implements trapezoidal integration, a
//! band-limited derivative computed on the measurement, and clamping
//! anti-windup where the integrator absorbs whatever the output clamp
//! removed.
//!
//! Each guided axis owns its own `PidController`; instances are never
//! shared across axes or modes.

/// Tunable PID parameters.
///
/// Constructed from a parameter block at mode-init time and never
/// modified by the controller itself.
#[derive(Debug, Clone, Copy)]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Derivative low-pass filter time constant (seconds)
    pub tau: f64,
    /// Lower output limit
    pub lim_min: f64,
    /// Upper output limit
    pub lim_max: f64,
    /// Lower integrator limit (reserved, not enforced by the clamping
    /// anti-windup path)
    pub lim_min_int: f64,
    /// Upper integrator limit (reserved, see above)
    pub lim_max_int: f64,
    /// Sample period assumed for the first update after `init()` (seconds)
    pub nominal_dt: f64,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
            tau: 0.5,
            lim_min: -1.0,
            lim_max: 1.0,
            lim_min_int: 0.0,
            lim_max_int: 0.0,
            nominal_dt: 0.02,
        }
    }
}

impl PidConfig {
    /// Basic sanity check used when a mode refuses to start with a
    /// broken tuning block.
    pub fn is_valid(&self) -> bool {
        self.lim_min < self.lim_max && self.tau > 0.0 && self.nominal_dt > 0.0
    }
}

/// Single-axis PID controller with runtime state.
#[derive(Debug, Clone)]
pub struct PidController {
    config: PidConfig,
    integrator: f64,
    prev_error: f64,
    differentiator: f64,
    prev_measurement: f64,
    prev_t_us: u64,
    out: f64,
}

impl PidController {
    /// Create a controller with the given tuning. Runtime state starts
    /// zeroed, equivalent to a fresh `init()`.
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integrator: 0.0,
            prev_error: 0.0,
            differentiator: 0.0,
            prev_measurement: 0.0,
            prev_t_us: 0,
            out: 0.0,
        }
    }

    /// Clear runtime state. Gains and limits are untouched, so calling
    /// this mid-flight never erases tuning.
    pub fn init(&mut self) {
        self.integrator = 0.0;
        self.prev_error = 0.0;
        self.differentiator = 0.0;
        self.prev_measurement = 0.0;
        self.prev_t_us = 0;
        self.out = 0.0;
    }

    /// Last computed output.
    pub fn output(&self) -> f64 {
        self.out
    }

    /// Current tuning.
    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Advance the controller one sample.
    ///
    /// `now_us` is the caller's wall clock in microseconds. The first
    /// update after `init()` has no previous timestamp and uses the
    /// configured `nominal_dt` instead of the absolute clock value.
    ///
    /// The derivative acts on the measurement, not the error, so a step
    /// change in the setpoint does not kick the output.
    pub fn update(&mut self, setpoint: f64, measurement: f64, now_us: u64) -> f64 {
        // A freshly-initialized controller has no previous sample: assume
        // the nominal period and an unchanged measurement instead of
        // differencing against the zeroed history.
        let first_sample = self.prev_t_us == 0;
        let t = if first_sample {
            self.config.nominal_dt
        } else {
            now_us.saturating_sub(self.prev_t_us) as f64 / 1_000_000.0
        };
        let prev_measurement = if first_sample {
            measurement
        } else {
            self.prev_measurement
        };

        let error = setpoint - measurement;
        let proportional = self.config.kp * error;

        // Trapezoidal integration over the last two error samples.
        self.integrator += 0.5 * self.config.ki * t * (error + self.prev_error);

        // Band-limited differentiator on the measurement.
        self.differentiator = -(2.0 * self.config.kd * (measurement - prev_measurement)
            + (2.0 * self.config.tau - t) * self.differentiator)
            / (2.0 * self.config.tau + t);

        let unclamped = proportional + self.integrator + self.differentiator;
        self.out = unclamped.clamp(self.config.lim_min, self.config.lim_max);

        // Anti-windup: the integrator absorbs whatever clamping removed,
        // so it always reflects what the actuator can actually express.
        if self.out != unclamped {
            self.integrator += self.out - unclamped;
        }

        self.prev_error = error;
        self.prev_measurement = measurement;
        self.prev_t_us = now_us;

        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PidConfig {
        PidConfig {
            kp: 2.0,
            ki: 0.5,
            kd: 0.1,
            tau: 0.1,
            lim_min: -30.0,
            lim_max: 30.0,
            nominal_dt: 0.02,
            ..PidConfig::default()
        }
    }

    #[test]
    fn test_zero_error_converges_to_zero() {
        let mut pid = PidController::new(test_config());
        let mut now = 20_000u64;

        for _ in 0..500 {
            pid.update(5.0, 5.0, now);
            now += 20_000;
        }

        assert!(
            pid.output().abs() < 1e-9,
            "output should settle to 0 with zero error, got {}",
            pid.output()
        );
    }

    #[test]
    fn test_proportional_response() {
        let config = PidConfig {
            ki: 0.0,
            kd: 0.0,
            ..test_config()
        };
        let mut pid = PidController::new(config);

        let out = pid.update(10.0, 0.0, 20_000);
        assert!((out - 20.0).abs() < 1e-9, "kp*error expected, got {}", out);
    }

    #[test]
    fn test_anti_windup_clamps_exactly() {
        let mut pid = PidController::new(test_config());
        let mut now = 20_000u64;

        // Error large enough that the unclamped output exceeds lim_max.
        for _ in 0..200 {
            let out = pid.update(1000.0, 0.0, now);
            assert_eq!(out, 30.0, "saturated output must sit exactly at lim_max");
            now += 20_000;
        }

        // The integrator must not have grown unbounded: once the error
        // drops to zero, the output must leave saturation promptly.
        for _ in 0..5 {
            pid.update(0.0, 0.0, now);
            now += 20_000;
        }
        assert!(
            pid.output() < 30.0,
            "integrator wound up despite clamping, output {}",
            pid.output()
        );
    }

    #[test]
    fn test_lower_limit_anti_windup() {
        let mut pid = PidController::new(test_config());
        let mut now = 20_000u64;

        for _ in 0..200 {
            let out = pid.update(-1000.0, 0.0, now);
            assert_eq!(out, -30.0);
            now += 20_000;
        }
    }

    #[test]
    fn test_no_derivative_kick_on_setpoint_step() {
        let config = PidConfig {
            kp: 0.0,
            ki: 0.0,
            kd: 1.0,
            ..test_config()
        };
        let mut pid = PidController::new(config);

        pid.update(0.0, 0.0, 20_000);
        // Setpoint jumps, measurement stays put: derivative term must not
        // react to the step.
        let out = pid.update(50.0, 0.0, 40_000);
        assert!(
            out.abs() < 1e-6,
            "setpoint step leaked into derivative: {}",
            out
        );
    }

    #[test]
    fn test_derivative_reacts_to_measurement() {
        let config = PidConfig {
            kp: 0.0,
            ki: 0.0,
            kd: 1.0,
            ..test_config()
        };
        let mut pid = PidController::new(config);

        pid.update(0.0, 0.0, 20_000);
        let out = pid.update(0.0, 10.0, 40_000);
        assert!(out < 0.0, "rising measurement should push output down");
    }

    #[test]
    fn test_init_preserves_tuning() {
        let mut pid = PidController::new(test_config());
        let mut now = 20_000u64;
        for _ in 0..10 {
            pid.update(3.0, 1.0, now);
            now += 20_000;
        }

        pid.init();

        assert_eq!(pid.output(), 0.0);
        assert_eq!(pid.config().kp, 2.0);
        assert_eq!(pid.config().lim_max, 30.0);
    }

    #[test]
    fn test_first_call_uses_nominal_dt() {
        let config = PidConfig {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
            ..test_config()
        };
        let mut pid = PidController::new(config);

        // A huge absolute timestamp on the very first call must not blow
        // up the integrator: only nominal_dt worth of integration.
        let out = pid.update(1.0, 0.0, 3_600_000_000);
        assert!(
            (out - 0.5 * 0.02).abs() < 1e-9,
            "first-sample integration should use nominal_dt, got {}",
            out
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(test_config().is_valid());
        assert!(!PidConfig {
            lim_min: 1.0,
            lim_max: -1.0,
            ..test_config()
        }
        .is_valid());
        assert!(!PidConfig {
            tau: 0.0,
            ..test_config()
        }
        .is_valid());
    }
}
