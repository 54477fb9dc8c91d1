//! Work queues: a named worker thread draining a bounded job queue.
//!
//! Grounded on the original's `eai_osal_work` / `eai_osal_dwork`, which
//! layer deferred and delayed execution on top of the FreeRTOS timer and
//! queue primitives already in this crate. Submitting to a full queue is
//! a `NoMemory` error here rather than a silent drop, matching this
//! crate's generic [`crate::queue::Queue`] contract.

use std::sync::Arc;

use crate::queue::Queue;
use crate::status::{OsalStatus, WAIT_FOREVER};
use crate::thread::Thread;
use crate::timer::Timer;

type Job = Arc<dyn Fn() + Send + Sync>;

/// A unit of deferred work, runnable on any [`WorkQueue`].
#[derive(Clone)]
pub struct Work {
    job: Job,
}

impl Work {
    pub fn new<F>(job: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self { job: Arc::new(job) }
    }
}

/// A named worker thread that runs submitted [`Work`] items in submission
/// order.
pub struct WorkQueue {
    queue: Arc<Queue<Job>>,
    worker: Option<Thread>,
}

impl WorkQueue {
    /// Spawn a worker thread draining a queue of the given capacity.
    pub fn new(name: &str, capacity: usize, priority: u8) -> Result<Self, OsalStatus> {
        let queue = Arc::new(Queue::new(capacity));
        let worker_queue = queue.clone();
        let worker = Thread::spawn(name, priority, move || loop {
            match worker_queue.receive(WAIT_FOREVER) {
                Ok(job) => job(),
                Err(_) => continue,
            }
        })?;
        Ok(Self {
            queue,
            worker: Some(worker),
        })
    }

    /// Submit `work` to run as soon as the worker is free. Returns
    /// `NoMemory` if the queue is at capacity.
    pub fn submit(&self, work: Work) -> OsalStatus {
        match self.queue.send(work.job, crate::status::NO_WAIT) {
            Ok(()) => OsalStatus::Ok,
            Err(_) => OsalStatus::NoMemory,
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for WorkQueue {
    fn drop(&mut self) {
        // The worker thread blocks forever on an empty queue; there's no
        // clean shutdown signal on this backend, so we let it leak with
        // the process the way the original's work queue task is never
        // torn down either. Detach rather than join to avoid hanging.
        self.worker.take();
    }
}

/// Result of [`DelayedWork::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelStatus {
    /// The work had not yet been submitted; it will not run.
    Disarmed,
    /// The work was already handed to the queue, or the timer daemon had
    /// already fired it, before `cancel` ran.
    AlreadyPending,
}

/// Work scheduled to run after a delay, submitted through a target
/// [`WorkQueue`] when the delay elapses.
pub struct DelayedWork {
    timer: Timer,
}

impl DelayedWork {
    /// Schedule `work` to be submitted to `target` after `delay_ms`.
    pub fn schedule(target: Arc<WorkQueue>, work: Work, delay_ms: u32) -> Self {
        let timer = Timer::new(move || {
            target.submit(work.clone());
        });
        timer.start(delay_ms, None);
        Self { timer }
    }

    /// Attempt to prevent the scheduled submission. Racy by nature: the
    /// timer daemon may already have fired and disarmed the timer itself
    /// by the time this runs, in which case it's indistinguishable from
    /// a wait that was never armed.
    pub fn cancel(&self) -> CancelStatus {
        let was_running = self.timer.is_running();
        self.timer.stop();
        if was_running {
            CancelStatus::Disarmed
        } else {
            CancelStatus::AlreadyPending
        }
    }
}
