//! Monotonic time. One tick == one millisecond on the simulation backend.

use std::sync::OnceLock;
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();

fn epoch() -> Instant {
    *EPOCH.get_or_init(Instant::now)
}

/// Milliseconds since an arbitrary, process-lifetime epoch. Monotonic.
pub fn now_ms() -> u64 {
    epoch().elapsed().as_millis() as u64
}

/// Ticks since the same epoch as [`now_ms`]. One tick is one millisecond
/// on this backend, so `ticks_to_ms(now_ticks()) == now_ms()` exactly
/// rather than merely "within one tick period".
pub fn now_ticks() -> u64 {
    now_ms()
}

pub fn ticks_to_ms(ticks: u64) -> u64 {
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn monotonic_never_decreases() {
        let a = now_ms();
        sleep(Duration::from_millis(5));
        let b = now_ms();
        assert!(b >= a);
    }

    #[test]
    fn ticks_round_trip() {
        let t = now_ticks();
        assert_eq!(ticks_to_ms(t), t);
    }
}
