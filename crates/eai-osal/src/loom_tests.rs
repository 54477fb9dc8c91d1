//! Loom model checks for the invariants `Mutex` and `Semaphore` promise.
//!
//! Loom explores every thread interleaving of code built on its own
//! synchronization primitives; it cannot instrument `std::sync::Mutex` /
//! `Condvar` directly. So, the way `zos-unsafe-primitives` models its bump
//! allocator's invariants with a loom-native stand-in rather than running
//! loom over the production allocator, these tests build small models of
//! the same invariants (mutual exclusion, a bounded count) out of loom's
//! own atomics and check them under the model checker.
//!
//! Run with:
//! ```bash
//! cargo test --package eai-osal --features loom -- --test-threads=1 loom
//! ```

#[cfg(all(test, feature = "loom"))]
mod tests {
    use loom::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use loom::sync::Arc;
    use loom::thread;

    /// Models `Mutex`'s recursion-depth bookkeeping: an owner slot plus a
    /// depth counter, entered via compare-and-swap instead of blocking so
    /// loom can explore the interleavings without needing a park/wake
    /// primitive of its own.
    struct LoomMutex {
        owner: AtomicI64,
        depth: AtomicUsize,
    }

    const NO_OWNER: i64 = -1;

    impl LoomMutex {
        fn new() -> Self {
            Self {
                owner: AtomicI64::new(NO_OWNER),
                depth: AtomicUsize::new(0),
            }
        }

        /// Spin until this thread becomes (or already is) the owner, then
        /// bump the depth counter. Returns the depth observed immediately
        /// after acquiring the outermost level, for the caller to assert
        /// mutual exclusion against.
        fn lock(&self, me: i64) {
            loop {
                let current = self.owner.load(Ordering::Acquire);
                if current == me {
                    self.depth.fetch_add(1, Ordering::AcqRel);
                    return;
                }
                if current == NO_OWNER
                    && self
                        .owner
                        .compare_exchange(NO_OWNER, me, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                {
                    self.depth.fetch_add(1, Ordering::AcqRel);
                    return;
                }
                thread::yield_now();
            }
        }

        fn unlock(&self, me: i64) {
            assert_eq!(self.owner.load(Ordering::Acquire), me, "unlock by non-owner");
            if self.depth.fetch_sub(1, Ordering::AcqRel) == 1 {
                self.owner.store(NO_OWNER, Ordering::Release);
            }
        }
    }

    /// Two threads racing to acquire never observe each other as the
    /// owner at the same time — the core invariant `Mutex::lock` promises
    /// to non-reentrant callers.
    #[test]
    fn loom_mutex_excludes_concurrent_owners() {
        loom::model(|| {
            let mutex = Arc::new(LoomMutex::new());
            let seen_other = Arc::new(loom::sync::atomic::AtomicBool::new(false));

            let m1 = mutex.clone();
            let s1 = seen_other.clone();
            let t1 = thread::spawn(move || {
                m1.lock(1);
                if m1.owner.load(Ordering::Acquire) != 1 {
                    s1.store(true, Ordering::SeqCst);
                }
                m1.unlock(1);
            });

            let m2 = mutex.clone();
            let s2 = seen_other.clone();
            let t2 = thread::spawn(move || {
                m2.lock(2);
                if m2.owner.load(Ordering::Acquire) != 2 {
                    s2.store(true, Ordering::SeqCst);
                }
                m2.unlock(2);
            });

            t1.join().unwrap();
            t2.join().unwrap();

            assert!(!seen_other.load(Ordering::SeqCst), "mutex let two owners in at once");
            assert_eq!(mutex.owner.load(Ordering::Acquire), NO_OWNER);
            assert_eq!(mutex.depth.load(Ordering::Acquire), 0);
        });
    }

    /// Re-entrant lock/unlock by the same owner nets out to a fully
    /// released mutex, the invariant `Mutex`'s unlock-count-must-match-
    /// lock-count contract depends on.
    #[test]
    fn loom_mutex_reentry_nets_to_released() {
        loom::model(|| {
            let mutex = LoomMutex::new();
            mutex.lock(1);
            mutex.lock(1);
            mutex.unlock(1);
            assert_eq!(mutex.owner.load(Ordering::Acquire), 1);
            mutex.unlock(1);
            assert_eq!(mutex.owner.load(Ordering::Acquire), NO_OWNER);
        });
    }

    /// Models `Semaphore`'s give-is-capped-at-limit invariant: concurrent
    /// `give`s never push the count past `limit`.
    struct LoomSemaphore {
        count: AtomicUsize,
        limit: usize,
    }

    impl LoomSemaphore {
        fn new(limit: usize) -> Self {
            Self {
                count: AtomicUsize::new(0),
                limit,
            }
        }

        fn give(&self) {
            loop {
                let current = self.count.load(Ordering::Acquire);
                if current >= self.limit {
                    return;
                }
                if self
                    .count
                    .compare_exchange(current, current + 1, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    return;
                }
            }
        }
    }

    #[test]
    fn loom_semaphore_give_never_exceeds_limit() {
        loom::model(|| {
            let sem = Arc::new(LoomSemaphore::new(1));

            let s1 = sem.clone();
            let t1 = thread::spawn(move || s1.give());
            let s2 = sem.clone();
            let t2 = thread::spawn(move || s2.give());

            t1.join().unwrap();
            t2.join().unwrap();

            assert!(sem.count.load(Ordering::Acquire) <= 1);
        });
    }
}

// ============================================================================
// Documentation-only module for non-loom builds
// ============================================================================

#[cfg(not(feature = "loom"))]
/// Loom tests are only available with the `loom` feature.
///
/// To run loom tests:
/// ```bash
/// cargo test --package eai-osal --features loom -- --test-threads=1 loom
/// ```
pub mod _loom_docs {}
