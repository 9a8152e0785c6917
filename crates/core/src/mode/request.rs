//! Mode transition requests
//!
//! A deferred launch-to-auto transition fires from timer/interrupt
//! context while the superloop may be mid-cycle. Requests therefore go
//! through [`PendingTransition`], a single atomic cell the mode manager
//! drains once per iteration; nothing ever mutates the active mode from
//! outside the superloop.

use core::sync::atomic::{AtomicU16, Ordering};

use super::FlightMode;

/// A requested transition: either a plain mode change or the launch
/// wrapper with its recorded follow-up mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    /// Switch straight to a mode.
    Mode(FlightMode),
    /// Enter launch detection, settling into `after` once airborne.
    Launch {
        /// Mode to hand control to after the climb-out.
        after: FlightMode,
    },
}

impl ModeRequest {
    /// Request name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeRequest::Mode(mode) => mode.as_str(),
            ModeRequest::Launch { .. } => "Launch",
        }
    }
}

const TAG_EMPTY: u16 = 0;
const TAG_MODE: u16 = 0x0100;
const TAG_LAUNCH: u16 = 0x0200;

fn encode(request: ModeRequest) -> u16 {
    match request {
        ModeRequest::Mode(mode) => TAG_MODE | mode as u16,
        ModeRequest::Launch { after } => TAG_LAUNCH | after as u16,
    }
}

fn decode(raw: u16) -> Option<ModeRequest> {
    let mode = FlightMode::from_u8((raw & 0x00FF) as u8)?;
    match raw & 0xFF00 {
        TAG_MODE => Some(ModeRequest::Mode(mode)),
        TAG_LAUNCH => Some(ModeRequest::Launch { after: mode }),
        _ => None,
    }
}

/// Single-slot transition mailbox.
///
/// `request` may be called from interrupt context; `take` is called by
/// the mode manager at the top of each superloop iteration. A newer
/// request overwrites an unconsumed older one, which is the behavior we
/// want: the most recent command wins.
#[derive(Debug)]
pub struct PendingTransition(AtomicU16);

impl PendingTransition {
    pub const fn new() -> Self {
        Self(AtomicU16::new(TAG_EMPTY))
    }

    /// Post a transition request.
    pub fn request(&self, request: ModeRequest) {
        self.0.store(encode(request), Ordering::Release);
    }

    /// Consume the pending request, if any.
    pub fn take(&self) -> Option<ModeRequest> {
        let raw = self.0.swap(TAG_EMPTY, Ordering::AcqRel);
        if raw == TAG_EMPTY {
            None
        } else {
            decode(raw)
        }
    }

    /// Peek without consuming (telemetry only).
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire) != TAG_EMPTY
    }
}

impl Default for PendingTransition {
    fn default() -> Self {
        Self::new()
    }
}
