//! Critical section: a global spinlock with recursive entry from the same
//! thread.
//!
//! Grounded on the ESP32 dual-core backend in the original, which uses a
//! `portMUX_TYPE` spinlock rather than disabling interrupts globally (the
//! single-core FreeRTOS backend just masks interrupts, which has no
//! meaningful analogue on a hosted OS). The returned key is opaque and
//! unused by this backend — it exists so callers written against a future
//! backend that does need one (e.g. a saved interrupt mask) don't need to
//! change call sites.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::hint;

static LOCK: AtomicBool = AtomicBool::new(false);

thread_local! {
    static DEPTH: Cell<u32> = Cell::new(0);
}

/// Opaque token returned by [`enter`] and required by [`exit`]. Carries no
/// information on this backend.
#[derive(Debug, Clone, Copy)]
pub struct CriticalKey(());

/// Enter the critical section, spinning if another thread holds it.
/// Safe to call again on the same thread while already inside one.
pub fn enter() -> CriticalKey {
    let depth = DEPTH.with(|d| d.get());
    if depth == 0 {
        while LOCK
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            hint::spin_loop();
        }
    }
    DEPTH.with(|d| d.set(depth + 1));
    CriticalKey(())
}

/// Leave the critical section entered by a matching [`enter`] call.
pub fn exit(_key: CriticalKey) {
    DEPTH.with(|d| {
        let depth = d.get();
        debug_assert!(depth > 0, "critical::exit without matching enter");
        let depth = depth.saturating_sub(1);
        d.set(depth);
        if depth == 0 {
            LOCK.store(false, Ordering::Release);
        }
    });
}
