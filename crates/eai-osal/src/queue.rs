//! Fixed-capacity FIFO queue.
//!
//! Grounded on the `xQueueSend`/`xQueueReceive` wrapper in the original:
//! bounded capacity set at creation, strict FIFO order, and send/receive
//! both take a timeout rather than the queue silently dropping or
//! blocking forever.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex as StdMutex};

use crate::mutex::{deadline_for, wait_for};
use crate::status::{OsalStatus, NO_WAIT};

pub struct Queue<T> {
    capacity: usize,
    items: StdMutex<VecDeque<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> Queue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: StdMutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Push `item` to the back, blocking up to `timeout_ms` while full.
    pub fn send(&self, item: T, timeout_ms: u32) -> Result<(), (OsalStatus, T)> {
        let deadline = deadline_for(timeout_ms);
        let mut guard = match self.items.lock() {
            Ok(g) => g,
            Err(_) => return Err((OsalStatus::Error, item)),
        };
        loop {
            if guard.len() < self.capacity {
                guard.push_back(item);
                self.not_empty.notify_one();
                return Ok(());
            }
            if timeout_ms == NO_WAIT {
                return Err((OsalStatus::Timeout, item));
            }
            guard = match wait_for(&self.not_full, guard, deadline) {
                Some(g) => g,
                None => return Err((OsalStatus::Timeout, item)),
            };
        }
    }

    /// Pop the front item, blocking up to `timeout_ms` while empty.
    pub fn receive(&self, timeout_ms: u32) -> Result<T, OsalStatus> {
        let deadline = deadline_for(timeout_ms);
        let mut guard = self.items.lock().map_err(|_| OsalStatus::Error)?;
        loop {
            if let Some(item) = guard.pop_front() {
                self.not_full.notify_one();
                return Ok(item);
            }
            if timeout_ms == NO_WAIT {
                return Err(OsalStatus::Timeout);
            }
            guard = match wait_for(&self.not_empty, guard, deadline) {
                Some(g) => g,
                None => return Err(OsalStatus::Timeout),
            };
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
