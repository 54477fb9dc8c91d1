//! Counting semaphore.
//!
//! Grounded on the FreeRTOS binary/counting semaphore wrapper in the
//! original: `give()` past the configured limit is not an error, it's a
//! silent no-op — the original treats an `xSemaphoreGive` failure from
//! being-at-max as success, matching how producers that race a slow
//! consumer are not supposed to need any error handling.

use std::sync::Mutex as StdMutex;
use std::sync::Condvar;

use crate::mutex::wait_for;
use crate::status::{OsalStatus, NO_WAIT, WAIT_FOREVER};

struct State {
    count: u32,
    limit: u32,
}

pub struct Semaphore {
    state: StdMutex<State>,
    available: Condvar,
}

impl Semaphore {
    /// `initial` must not exceed `limit`.
    pub fn new(initial: u32, limit: u32) -> Self {
        Self {
            state: StdMutex::new(State {
                count: initial.min(limit),
                limit,
            }),
            available: Condvar::new(),
        }
    }

    /// Increment the count, capped at `limit`. Always succeeds.
    pub fn give(&self) -> OsalStatus {
        let mut guard = match self.state.lock() {
            Ok(g) => g,
            Err(_) => return OsalStatus::Error,
        };
        if guard.count < guard.limit {
            guard.count += 1;
            self.available.notify_one();
        }
        OsalStatus::Ok
    }

    /// Decrement the count, blocking up to `timeout_ms` while it is zero.
    pub fn take(&self, timeout_ms: u32) -> OsalStatus {
        use crate::mutex::deadline_for;
        let deadline = deadline_for(timeout_ms);
        let mut guard = match self.state.lock() {
            Ok(g) => g,
            Err(_) => return OsalStatus::Error,
        };
        loop {
            if guard.count > 0 {
                guard.count -= 1;
                return OsalStatus::Ok;
            }
            if timeout_ms == NO_WAIT {
                return OsalStatus::Timeout;
            }
            guard = match wait_for(&self.available, guard, deadline) {
                Some(g) => g,
                None => return OsalStatus::Timeout,
            };
        }
    }

    /// Current count, for diagnostics/tests only.
    pub fn count(&self) -> u32 {
        self.state.lock().map(|g| g.count).unwrap_or(0)
    }
}
