//! Waypoint types and flight-plan storage
//!
//! A [`Waypoint`] is a transient value object owned by the guidance loop
//! for the duration of one leg. The [`FlightPlan`] trait abstracts the
//! provider that yields the next leg once the current one is reached;
//! [`WaypointQueue`] is the bounded in-memory implementation used by the
//! firmware and by tests.

use heapless::Vec;

/// Altitude sentinel: keep the current altitude for this leg.
pub const ALT_HOLD_CURRENT: i32 = -5;

/// Speed sentinel: keep the current speed command for this leg.
pub const SPEED_HOLD_CURRENT: f32 = -5.0;

/// Drop-bay command: leave the bay alone.
pub const DROP_NONE: i32 = 0;

/// Drop-bay command: open the bay on arrival at this waypoint.
pub const DROP_RELEASE: i32 = 1;

/// Maximum number of waypoints held in a flight plan.
pub const MAX_WAYPOINTS: usize = 32;

/// One navigation target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Target altitude in meters, or [`ALT_HOLD_CURRENT`]
    pub alt_m: i32,
    /// Target speed command, or [`SPEED_HOLD_CURRENT`]
    pub speed: f32,
    /// Drop-bay command executed on arrival ([`DROP_NONE`] / [`DROP_RELEASE`])
    pub drop: i32,
}

impl Waypoint {
    /// Waypoint at a position, holding current altitude and speed.
    pub fn at(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            alt_m: ALT_HOLD_CURRENT,
            speed: SPEED_HOLD_CURRENT,
            drop: DROP_NONE,
        }
    }

    /// Full constructor.
    pub fn new(lat: f64, lon: f64, alt_m: i32, speed: f32, drop: i32) -> Self {
        Self {
            lat,
            lon,
            alt_m,
            speed,
            drop,
        }
    }

    /// True when this leg keeps the current altitude.
    pub fn holds_altitude(&self) -> bool {
        self.alt_m == ALT_HOLD_CURRENT
    }

    /// True when this leg keeps the current speed command.
    pub fn holds_speed(&self) -> bool {
        self.speed == SPEED_HOLD_CURRENT
    }

    /// True when arrival at this waypoint opens the drop bay.
    pub fn commands_drop(&self) -> bool {
        self.drop == DROP_RELEASE
    }
}

/// Source of navigation legs for AUTO mode.
///
/// Implementations yield the next waypoint once the active one has been
/// reached, or `None` when the plan is exhausted.
pub trait FlightPlan {
    /// Advance to and return the next waypoint.
    fn next_waypoint(&mut self) -> Option<Waypoint>;

    /// True while un-flown waypoints remain.
    fn has_remaining(&self) -> bool;
}

/// Bounded in-memory flight plan.
///
/// Waypoints are consumed front to back; `clear` rewinds and empties the
/// queue.
#[derive(Debug, Default)]
pub struct WaypointQueue {
    items: Vec<Waypoint, MAX_WAYPOINTS>,
    cursor: usize,
}

impl WaypointQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }

    /// Append a waypoint. Fails when the queue is full.
    pub fn push(&mut self, wp: Waypoint) -> Result<(), &'static str> {
        self.items.push(wp).map_err(|_| "flight plan full")
    }

    /// Remove all waypoints and rewind.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    /// Total number of uploaded waypoints.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing has been uploaded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FlightPlan for WaypointQueue {
    fn next_waypoint(&mut self) -> Option<Waypoint> {
        let wp = self.items.get(self.cursor).copied();
        if wp.is_some() {
            self.cursor += 1;
        }
        wp
    }

    fn has_remaining(&self) -> bool {
        self.cursor < self.items.len()
    }
}
