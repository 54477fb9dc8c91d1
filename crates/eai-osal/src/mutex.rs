//! Recursive mutex.
//!
//! FreeRTOS and Zephyr both expose a recursive mutex primitive natively;
//! this backend hand-rolls re-entry tracking on top of `std::sync::Mutex` +
//! `Condvar` the way the original's `eai_osal_mutex_t` wraps
//! `xSemaphoreCreateRecursiveMutex()`.

use std::sync::{Condvar, Mutex as StdMutex};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use crate::status::{OsalStatus, NO_WAIT, WAIT_FOREVER};

struct State {
    owner: Option<ThreadId>,
    depth: u32,
}

/// A recursive mutex: the owning thread may re-acquire it without
/// deadlocking. Unlock count must match lock count before the last
/// unlock releases it to other threads.
pub struct Mutex {
    state: StdMutex<State>,
    released: Condvar,
}

impl Mutex {
    pub fn new() -> Self {
        Self {
            state: StdMutex::new(State { owner: None, depth: 0 }),
            released: Condvar::new(),
        }
    }

    /// Acquire the mutex, blocking up to `timeout_ms`.
    pub fn lock(&self, timeout_ms: u32) -> OsalStatus {
        let me = thread::current().id();
        let deadline = deadline_for(timeout_ms);
        let mut guard = match self.state.lock() {
            Ok(g) => g,
            Err(_) => return OsalStatus::Error,
        };
        loop {
            if guard.owner.is_none() || guard.owner == Some(me) {
                guard.owner = Some(me);
                guard.depth += 1;
                return OsalStatus::Ok;
            }
            if timeout_ms == NO_WAIT {
                return OsalStatus::Timeout;
            }
            guard = match wait_for(&self.released, guard, deadline) {
                Some(g) => g,
                None => return OsalStatus::Timeout,
            };
        }
    }

    /// Release one level of recursion. Errors if the caller doesn't hold it.
    pub fn unlock(&self) -> OsalStatus {
        let me = thread::current().id();
        let mut guard = match self.state.lock() {
            Ok(g) => g,
            Err(_) => return OsalStatus::Error,
        };
        if guard.owner != Some(me) {
            return OsalStatus::Error;
        }
        guard.depth -= 1;
        if guard.depth == 0 {
            guard.owner = None;
            self.released.notify_one();
        }
        OsalStatus::Ok
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn deadline_for(timeout_ms: u32) -> Option<Instant> {
    if timeout_ms == WAIT_FOREVER {
        None
    } else {
        Some(Instant::now() + Duration::from_millis(timeout_ms as u64))
    }
}

/// Waits on `cv` until notified or `deadline` passes (`None` == forever).
/// Returns `None` on timeout, `Some(guard)` once re-acquired.
pub(crate) fn wait_for<'a, T>(
    cv: &Condvar,
    guard: std::sync::MutexGuard<'a, T>,
    deadline: Option<Instant>,
) -> Option<std::sync::MutexGuard<'a, T>> {
    match deadline {
        None => cv.wait(guard).ok(),
        Some(d) => {
            let now = Instant::now();
            if now >= d {
                return None;
            }
            let (guard, result) = cv.wait_timeout(guard, d - now).ok()?;
            if result.timed_out() {
                None
            } else {
                Some(guard)
            }
        }
    }
}
