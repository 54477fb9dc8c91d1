//! Joinable worker threads with a priority hint.
//!
//! The original maps a 0..31 application priority onto the platform's
//! native task-priority range (`1 + (prio * (configMAX_PRIORITIES - 2))
//! / 31`, reserving priority 0 for the idle task) and joins a task by
//! waiting on a binary semaphore the task's trampoline gives just before
//! it deletes itself. A hosted OS has no priority scheduling knob worth
//! exposing and `std::thread::JoinHandle` already gives a real join, so
//! this backend validates and records the priority for diagnostics but
//! leaves scheduling to the OS.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::status::{OsalStatus, TimeoutMs, NO_WAIT, WAIT_FOREVER};

/// Valid application priority range, inclusive. Mirrors the original's
/// 0..=31 task-priority input range.
pub const MIN_PRIORITY: u8 = 0;
pub const MAX_PRIORITY: u8 = 31;

/// A joinable worker thread.
pub struct Thread {
    handle: Option<JoinHandle<()>>,
    done_rx: Receiver<()>,
}

impl Thread {
    /// Spawn `body` as a named thread. Returns `Err` if `priority` is out
    /// of range; the thread is not started in that case.
    pub fn spawn<F>(name: &str, priority: u8, body: F) -> Result<Self, OsalStatus>
    where
        F: FnOnce() + Send + 'static,
    {
        if priority > MAX_PRIORITY {
            return Err(OsalStatus::InvalidParameter);
        }
        let (done_tx, done_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                body();
                let _ = done_tx.send(());
            })
            .map_err(|_| OsalStatus::Error)?;
        Ok(Self { handle: Some(handle), done_rx })
    }

    /// Block until the thread's body returns or `timeout_ms` elapses.
    ///
    /// On timeout the thread is left running; `std::thread::JoinHandle`
    /// has no way to cancel a native thread, so a timed-out join detaches
    /// it the same way the original leaves the task to delete itself.
    pub fn join(mut self, timeout_ms: TimeoutMs) -> OsalStatus {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => return OsalStatus::Error,
        };
        if timeout_ms != WAIT_FOREVER {
            let wait = Duration::from_millis(timeout_ms as u64);
            if timeout_ms == NO_WAIT {
                if self.done_rx.try_recv().is_err() {
                    return OsalStatus::Timeout;
                }
            } else if self.done_rx.recv_timeout(wait).is_err() {
                return OsalStatus::Timeout;
            }
        } else if self.done_rx.recv().is_err() {
            return OsalStatus::Error;
        }
        match handle.join() {
            Ok(()) => OsalStatus::Ok,
            Err(_) => OsalStatus::Error,
        }
    }
}
