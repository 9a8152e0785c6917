//! Deferred mode-transition scheduling
//!
//! The launch detector hands control to AUTO only after a settle delay,
//! via an external timer service. This module defines the service
//! contract and a deterministic mock for host tests; the platform crate
//! provides the real implementation on top of its timer peripheral.
//!
//! Contract: a scheduled callback fires at most once, and cancellation
//! before firing is guaranteed to suppress it. Firing never touches the
//! mode machine directly; it posts into a [`PendingTransition`] cell.

use heapless::Vec;

use crate::mode::{ModeRequest, PendingTransition};

/// Identifies one scheduled transition for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u32);

impl TimerHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// One-shot deferred transition service.
pub trait TimerService {
    /// Arrange for `request` to be posted to the pending-transition cell
    /// after `delay_ms`.
    fn schedule_transition(
        &mut self,
        delay_ms: u32,
        request: ModeRequest,
    ) -> Result<TimerHandle, &'static str>;

    /// Suppress a scheduled transition that has not fired yet. Unknown
    /// or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

const MAX_SLOTS: usize = 4;

/// Host-test timer service with manually advanced time.
///
/// Call [`MockTimerService::tick`] with the current time to fire due
/// transitions into the pending cell.
#[derive(Debug, Default)]
pub struct MockTimerService {
    slots: Vec<(TimerHandle, u64, ModeRequest), MAX_SLOTS>,
    next_id: u32,
    now_ms: u64,
}

impl MockTimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the mock clock and post any due transitions.
    pub fn tick(&mut self, now_ms: u64, pending: &PendingTransition) {
        self.now_ms = now_ms;

        let mut i = 0;
        while i < self.slots.len() {
            if self.slots[i].1 <= now_ms {
                let (_, _, request) = self.slots.swap_remove(i);
                pending.request(request);
            } else {
                i += 1;
            }
        }
    }

    /// Number of armed, un-fired slots.
    pub fn armed(&self) -> usize {
        self.slots.len()
    }
}

impl TimerService for MockTimerService {
    fn schedule_transition(
        &mut self,
        delay_ms: u32,
        request: ModeRequest,
    ) -> Result<TimerHandle, &'static str> {
        let handle = TimerHandle::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        self.slots
            .push((handle, self.now_ms + u64::from(delay_ms), request))
            .map_err(|_| "timer slots exhausted")?;
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(pos) = self.slots.iter().position(|(h, _, _)| *h == handle) {
            self.slots.swap_remove(pos);
        }
    }
}
