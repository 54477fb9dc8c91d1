//! Software timers, fired from a dedicated daemon thread.
//!
//! Grounded on the original's FreeRTOS timer service task: all timer
//! callbacks run on one dedicated thread, never on the caller's thread,
//! and a one-shot timer is just a periodic timer whose reload mode gets
//! toggled off after it fires (`xTimerChangePeriod` + reload-mode flip).
//! Here a single global daemon owns a min-heap of deadlines and a table
//! of armed timers; `Timer::start` registers with the daemon and wakes
//! it if the new deadline could be the earliest pending one.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use crate::status::OsalStatus;

type Callback = Box<dyn FnMut() + Send>;

struct Entry {
    period: Option<Duration>,
    armed: bool,
    callback: Callback,
}

struct DaemonState {
    next_id: u64,
    entries: HashMap<u64, Entry>,
    heap: BinaryHeap<Reverse<(Instant, u64)>>,
    shutdown: bool,
}

struct Daemon {
    state: Mutex<DaemonState>,
    wake: Condvar,
}

fn daemon() -> &'static Arc<Daemon> {
    static DAEMON: OnceLock<Arc<Daemon>> = OnceLock::new();
    DAEMON.get_or_init(|| {
        let daemon = Arc::new(Daemon {
            state: Mutex::new(DaemonState {
                next_id: 1,
                entries: HashMap::new(),
                heap: BinaryHeap::new(),
                shutdown: false,
            }),
            wake: Condvar::new(),
        });
        let worker = daemon.clone();
        thread::Builder::new()
            .name("eai-osal-timer".into())
            .spawn(move || run_daemon(worker))
            .expect("spawn timer daemon thread");
        daemon
    })
}

fn run_daemon(daemon: Arc<Daemon>) {
    let mut guard = match daemon.state.lock() {
        Ok(g) => g,
        Err(_) => return,
    };
    loop {
        if guard.shutdown {
            return;
        }
        match guard.heap.peek().copied() {
            None => {
                guard = match daemon.wake.wait(guard) {
                    Ok(g) => g,
                    Err(_) => return,
                };
            }
            Some(Reverse((due, id))) => {
                let now = Instant::now();
                if due > now {
                    let (g, _) = match daemon.wake.wait_timeout(guard, due - now) {
                        Ok(pair) => pair,
                        Err(_) => return,
                    };
                    guard = g;
                    continue;
                }
                guard.heap.pop();
                let should_fire = guard
                    .entries
                    .get(&id)
                    .map(|e| e.armed)
                    .unwrap_or(false);
                if !should_fire {
                    continue;
                }
                let period = guard.entries.get(&id).and_then(|e| e.period);
                // Take the callback out of the table before running it,
                // so a callback that cancels/restarts itself or another
                // timer doesn't need to reenter the lock it's called
                // under.
                let mut callback = match guard.entries.get_mut(&id) {
                    Some(entry) => std::mem::replace(&mut entry.callback, Box::new(|| {})),
                    None => continue,
                };
                drop(guard);
                callback();
                guard = daemon.state.lock().unwrap_or_else(|e| e.into_inner());
                if let Some(entry) = guard.entries.get_mut(&id) {
                    entry.callback = callback;
                }
                match period {
                    Some(p) => {
                        guard.heap.push(Reverse((Instant::now() + p, id)));
                    }
                    None => {
                        if let Some(e) = guard.entries.get_mut(&id) {
                            e.armed = false;
                        }
                    }
                }
            }
        }
    }
}

/// A software timer. Dropping a `Timer` stops it but does not remove it
/// from the daemon's table; the table is process-lifetime, matching the
/// original's static timer-control-block pool.
pub struct Timer {
    id: u64,
}

impl Timer {
    /// Register a new, unarmed timer with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let d = daemon();
        let mut guard = d.state.lock().unwrap_or_else(|e| e.into_inner());
        let id = guard.next_id;
        guard.next_id += 1;
        guard.entries.insert(
            id,
            Entry {
                period: None,
                armed: false,
                callback: Box::new(callback),
            },
        );
        Self { id }
    }

    /// Arm the timer to fire once after `initial_ms`, then, if
    /// `period_ms` is `Some`, repeatedly every `period_ms` thereafter.
    pub fn start(&self, initial_ms: u32, period_ms: Option<u32>) -> OsalStatus {
        let d = daemon();
        let mut guard = match d.state.lock() {
            Ok(g) => g,
            Err(_) => return OsalStatus::Error,
        };
        let due = Instant::now() + Duration::from_millis(initial_ms as u64);
        match guard.entries.get_mut(&self.id) {
            Some(entry) => {
                entry.armed = true;
                entry.period = period_ms.map(|p| Duration::from_millis(p as u64));
            }
            None => return OsalStatus::Error,
        }
        guard.heap.push(Reverse((due, self.id)));
        drop(guard);
        d.wake.notify_one();
        OsalStatus::Ok
    }

    /// Disarm the timer. A callback already in flight still completes.
    pub fn stop(&self) -> OsalStatus {
        let d = daemon();
        let mut guard = match d.state.lock() {
            Ok(g) => g,
            Err(_) => return OsalStatus::Error,
        };
        match guard.entries.get_mut(&self.id) {
            Some(entry) => {
                entry.armed = false;
                OsalStatus::Ok
            }
            None => OsalStatus::Error,
        }
    }

    pub fn is_running(&self) -> bool {
        let d = daemon();
        d.state
            .lock()
            .ok()
            .and_then(|g| g.entries.get(&self.id).map(|e| e.armed))
            .unwrap_or(false)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}
