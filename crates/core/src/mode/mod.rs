//! Flight-mode values, vehicle state, and transition requests
//!
//! The `Mode` dispatch itself lives in the vehicle crate; this module
//! holds the pure types shared across the boundary: the [`FlightMode`]
//! value set, the [`VehicleState`] context (mode plus sensor-health
//! flags), and the interrupt-safe [`PendingTransition`] cell used to
//! request transitions from timer callbacks.

mod request;

pub use request::{ModeRequest, PendingTransition};

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// First-class flight modes.
///
/// The launch wrapper is a mode-entry behavior carried by
/// [`ModeRequest::Launch`], not a value here: exactly one of these is
/// active at any time and each has a defined update function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FlightMode {
    /// Pilot pass-through, no stabilization
    Direct = 0,
    /// Rate-commanded attitude hold
    Normal = 1,
    /// Waypoint guidance
    Auto = 2,
    /// Single-axis autotune
    Tune = 3,
    /// Wings-level degraded hold
    Hold = 4,
}

impl FlightMode {
    /// Mode name for logging and telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightMode::Direct => "Direct",
            FlightMode::Normal => "Normal",
            FlightMode::Auto => "Auto",
            FlightMode::Tune => "Tune",
            FlightMode::Hold => "Hold",
        }
    }

    pub(crate) fn from_u8(v: u8) -> Option<FlightMode> {
        match v {
            0 => Some(FlightMode::Direct),
            1 => Some(FlightMode::Normal),
            2 => Some(FlightMode::Auto),
            3 => Some(FlightMode::Tune),
            4 => Some(FlightMode::Hold),
            _ => None,
        }
    }
}

/// Aircraft-wide state shared between the mode machine and the sensor
/// health monitors.
///
/// The mode field is mutated only by the mode manager; the safety flags
/// are written by external monitors (possibly from another context) and
/// read by the guidance path, hence atomics throughout.
#[derive(Debug)]
pub struct VehicleState {
    mode: AtomicU8,
    ahrs_safe: AtomicBool,
    gps_safe: AtomicBool,
}

impl VehicleState {
    /// New vehicle state starting in [`FlightMode::Direct`] with both
    /// sensor feeds flagged unsafe until the monitors report in.
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(FlightMode::Direct as u8),
            ahrs_safe: AtomicBool::new(false),
            gps_safe: AtomicBool::new(false),
        }
    }

    /// Currently active mode.
    pub fn mode(&self) -> FlightMode {
        // The cell only ever holds discriminants written by set_mode.
        FlightMode::from_u8(self.mode.load(Ordering::Relaxed)).unwrap_or(FlightMode::Direct)
    }

    /// Record the active mode. Called by the mode manager only.
    pub fn set_mode(&self, mode: FlightMode) {
        self.mode.store(mode as u8, Ordering::Relaxed);
    }

    /// Attitude solution usable?
    pub fn ahrs_safe(&self) -> bool {
        self.ahrs_safe.load(Ordering::Relaxed)
    }

    /// Position solution usable?
    pub fn gps_safe(&self) -> bool {
        self.gps_safe.load(Ordering::Relaxed)
    }

    /// Written by the attitude health monitor.
    pub fn set_ahrs_safe(&self, safe: bool) {
        self.ahrs_safe.store(safe, Ordering::Relaxed);
    }

    /// Written by the GPS health monitor.
    pub fn set_gps_safe(&self, safe: bool) {
        self.gps_safe.store(safe, Ordering::Relaxed);
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new()
    }
}
