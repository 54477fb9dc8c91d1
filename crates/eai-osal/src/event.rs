//! Event group: a 32-bit bitmask with wait-any / wait-all semantics.
//!
//! Grounded on `xEventGroupWaitBits` called with `xClearOnExit = pdFALSE`
//! in the original — bits set by [`EventGroup::set`] stay set across a
//! wait that is satisfied by them; callers that need edge-triggered
//! behaviour clear explicitly via [`EventGroup::clear`].

use std::sync::{Condvar, Mutex as StdMutex};

use crate::mutex::{deadline_for, wait_for};
use crate::status::{OsalStatus, NO_WAIT};

/// Whether a wait is satisfied by any one of the requested bits, or all
/// of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitMode {
    Any,
    All,
}

pub struct EventGroup {
    bits: StdMutex<u32>,
    changed: Condvar,
}

impl EventGroup {
    pub fn new() -> Self {
        Self {
            bits: StdMutex::new(0),
            changed: Condvar::new(),
        }
    }

    /// OR `bits` into the group, waking any satisfied waiters.
    pub fn set(&self, bits: u32) -> OsalStatus {
        let mut guard = match self.bits.lock() {
            Ok(g) => g,
            Err(_) => return OsalStatus::Error,
        };
        *guard |= bits;
        self.changed.notify_all();
        OsalStatus::Ok
    }

    /// Clear `bits` from the group.
    pub fn clear(&self, bits: u32) -> OsalStatus {
        let mut guard = match self.bits.lock() {
            Ok(g) => g,
            Err(_) => return OsalStatus::Error,
        };
        *guard &= !bits;
        OsalStatus::Ok
    }

    /// Block until `bits` is satisfied per `mode`, or `timeout_ms` elapses.
    /// Returns only the requested bits that were observed set, i.e.
    /// `observed & bits` — other bits set in the group are not reported.
    /// `bits == 0` is rejected as nothing can ever satisfy it.
    pub fn wait(&self, bits: u32, mode: WaitMode, timeout_ms: u32) -> Result<u32, OsalStatus> {
        if bits == 0 {
            return Err(OsalStatus::InvalidParameter);
        }
        let deadline = deadline_for(timeout_ms);
        let mut guard = self.bits.lock().map_err(|_| OsalStatus::Error)?;
        loop {
            if satisfied(*guard, bits, mode) {
                return Ok(*guard & bits);
            }
            if timeout_ms == NO_WAIT {
                return Err(OsalStatus::Timeout);
            }
            guard = match wait_for(&self.changed, guard, deadline) {
                Some(g) => g,
                None => return Err(OsalStatus::Timeout),
            };
        }
    }
}

fn satisfied(current: u32, wanted: u32, mode: WaitMode) -> bool {
    match mode {
        WaitMode::Any => current & wanted != 0,
        WaitMode::All => current & wanted == wanted,
    }
}

impl Default for EventGroup {
    fn default() -> Self {
        Self::new()
    }
}
