//! Flight-mode implementations
//!
//! One module per mode, a [`Mode`] trait they all implement, and the
//! [`PlaneMode`] enum the mode manager dispatches over. Mode values and
//! transition requests are `skylark_core` types; this layer supplies
//! their behavior.

pub mod auto;
pub mod direct;
pub mod hold;
pub mod launch;
pub mod normal;
pub mod tune;

pub use auto::AutoMode;
pub use direct::DirectMode;
pub use hold::HoldMode;
pub use launch::LaunchMode;
pub use normal::NormalMode;
pub use tune::TuneMode;

use super::PlaneContext;
use skylark_core::mode::{FlightMode, ModeRequest};
use skylark_core::parameters::ParameterStore;

/// Control mode lifecycle.
///
/// 1. `enter` - once, on transition in; an `Err` refuses the transition
/// 2. `update` - every superloop cycle while active
/// 3. `exit` - once, on transition out; must leave no stale state behind
pub trait Mode {
    fn enter(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str>;

    /// `dt` is the seconds elapsed since the previous cycle.
    fn update(&mut self, ctx: &mut PlaneContext, dt: f32) -> Result<(), &'static str>;

    fn exit(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str>;

    /// Mode name for logging and telemetry.
    fn name(&self) -> &'static str;
}

/// Tagged union over the mode implementations.
///
/// Every reachable request maps onto a variant here, so dispatch is
/// total by construction.
pub enum PlaneMode {
    Direct(DirectMode),
    Normal(NormalMode),
    Auto(AutoMode),
    Tune(TuneMode),
    Hold(HoldMode),
    Launch(LaunchMode),
}

impl PlaneMode {
    /// Build a fresh mode instance for a transition request, loading its
    /// parameter blocks from the store.
    pub fn from_request(request: ModeRequest, params: &ParameterStore) -> Self {
        match request {
            ModeRequest::Mode(FlightMode::Direct) => PlaneMode::Direct(DirectMode::new(params)),
            ModeRequest::Mode(FlightMode::Normal) => PlaneMode::Normal(NormalMode::new(params)),
            ModeRequest::Mode(FlightMode::Auto) => PlaneMode::Auto(AutoMode::new(params)),
            ModeRequest::Mode(FlightMode::Tune) => PlaneMode::Tune(TuneMode::new()),
            ModeRequest::Mode(FlightMode::Hold) => PlaneMode::Hold(HoldMode::new()),
            ModeRequest::Launch { after } => PlaneMode::Launch(LaunchMode::new(after, params)),
        }
    }

    /// The mode value reported in [`skylark_core::mode::VehicleState`].
    /// The launch wrapper reports its recorded follow-up mode.
    pub fn reported_mode(&self) -> FlightMode {
        match self {
            PlaneMode::Direct(_) => FlightMode::Direct,
            PlaneMode::Normal(_) => FlightMode::Normal,
            PlaneMode::Auto(_) => FlightMode::Auto,
            PlaneMode::Tune(_) => FlightMode::Tune,
            PlaneMode::Hold(_) => FlightMode::Hold,
            PlaneMode::Launch(launch) => launch.after(),
        }
    }

    fn inner(&mut self) -> &mut dyn Mode {
        match self {
            PlaneMode::Direct(m) => m,
            PlaneMode::Normal(m) => m,
            PlaneMode::Auto(m) => m,
            PlaneMode::Tune(m) => m,
            PlaneMode::Hold(m) => m,
            PlaneMode::Launch(m) => m,
        }
    }
}

impl Mode for PlaneMode {
    fn enter(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        self.inner().enter(ctx)
    }

    fn update(&mut self, ctx: &mut PlaneContext, dt: f32) -> Result<(), &'static str> {
        self.inner().update(ctx, dt)
    }

    fn exit(&mut self, ctx: &mut PlaneContext) -> Result<(), &'static str> {
        self.inner().exit(ctx)
    }

    fn name(&self) -> &'static str {
        match self {
            PlaneMode::Direct(_) => "Direct",
            PlaneMode::Normal(_) => "Normal",
            PlaneMode::Auto(_) => "Auto",
            PlaneMode::Tune(_) => "Tune",
            PlaneMode::Hold(_) => "Hold",
            PlaneMode::Launch(_) => "Launch",
        }
    }
}
