//! Portable OS abstraction layer.
//!
//! Every primitive in this crate is built on `std::thread` / `std::sync`
//! under the `sim` feature, the only backend implemented so far. A future
//! RTOS backend (FreeRTOS, Zephyr) would live behind its own feature
//! flag, re-exporting the same types from this module root so calling
//! code never needs to change.

#![forbid(unsafe_code)]

#[cfg(feature = "sim")]
mod critical;
#[cfg(feature = "sim")]
mod event;
#[cfg(any(test, feature = "loom"))]
mod loom_tests;
#[cfg(feature = "sim")]
mod mutex;
#[cfg(feature = "sim")]
mod queue;
#[cfg(feature = "sim")]
mod sem;
mod status;
#[cfg(feature = "sim")]
mod thread;
#[cfg(feature = "sim")]
mod time;
#[cfg(feature = "sim")]
mod timer;
#[cfg(feature = "sim")]
mod workqueue;

pub use status::{OsalStatus, TimeoutMs, NO_WAIT, WAIT_FOREVER};

#[cfg(feature = "sim")]
pub use critical::{enter as critical_enter, exit as critical_exit, CriticalKey};
#[cfg(feature = "sim")]
pub use event::{EventGroup, WaitMode};
#[cfg(feature = "sim")]
pub use mutex::Mutex;
#[cfg(feature = "sim")]
pub use queue::Queue;
#[cfg(feature = "sim")]
pub use sem::Semaphore;
#[cfg(feature = "sim")]
pub use thread::{Thread, MAX_PRIORITY, MIN_PRIORITY};
#[cfg(feature = "sim")]
pub use time::{now_ms, now_ticks, ticks_to_ms};
#[cfg(feature = "sim")]
pub use timer::Timer;
#[cfg(feature = "sim")]
pub use workqueue::{CancelStatus, DelayedWork, Work, WorkQueue};
