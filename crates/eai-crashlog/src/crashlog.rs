//! Crash-capture contract: `has_stored_dump` / `clear` / `emit`, plus a
//! boot-time auto-report hook.

use std::sync::Arc;

use crate::format::{HexFramer, BEGIN_MARKER, COPY_BUF_SZ, END_MARKER};
use crate::store::CoredumpStore;
use crate::types::{CrashError, CrashResult};

/// Owns a reference to wherever coredumps actually live and exposes the
/// three operations a shell/debug surface needs.
pub struct CrashLog {
    store: Arc<dyn CoredumpStore>,
}

impl CrashLog {
    pub fn new(store: Arc<dyn CoredumpStore>) -> Self {
        Self { store }
    }

    /// Whether a valid coredump is currently stored.
    pub fn has_stored_dump(&self) -> bool {
        self.store.has_dump()
    }

    /// Erase the stored coredump.
    pub fn clear(&self) -> CrashResult<()> {
        self.store.erase()
    }

    /// Emit the stored coredump as `#CD:` hex lines through the log at
    /// error level, framed by begin/end markers. `NotFound` if nothing
    /// is stored, `NoData` if the store reports a dump with zero size.
    pub fn emit(&self) -> CrashResult<()> {
        if !self.has_stored_dump() {
            return Err(CrashError::NotFound);
        }
        let size = self.store.size();
        if size == 0 {
            return Err(CrashError::NoData);
        }

        log::error!("{}", BEGIN_MARKER);

        let mut framer = HexFramer::new(|line: &str| log::error!("#CD:{}", line));
        let mut offset = 0;
        let mut buf = [0u8; COPY_BUF_SZ];
        while offset < size {
            let want = (size - offset).min(COPY_BUF_SZ);
            let n = self.store.copy(offset, &mut buf[..want])?;
            if n == 0 {
                log::error!("failed to read coredump at offset {offset}");
                return Err(CrashError::Io);
            }
            framer.push(&buf[..n]);
            offset += n;
        }
        framer.finish();

        log::error!("{}", END_MARKER);
        Ok(())
    }

    /// Call once at startup. Logs and emits any dump found from a
    /// previous boot; otherwise logs a clean-boot message. Mirrors the
    /// original's opt-in `CONFIG_CRASH_LOG_AUTO_REPORT` init hook, made
    /// an explicit call here since this crate has no init-priority
    /// system of its own.
    pub fn check_on_boot(&self) {
        if self.has_stored_dump() {
            log::error!("=== PREVIOUS CRASH DETECTED ===");
            log::error!("Stored coredump found. Emitting...");
            if let Err(e) = self.emit() {
                log::error!("failed to emit stored coredump: {e:?}");
            }
            log::error!("=== END CRASH REPORT ===");
            log::info!("call clear() to erase the stored dump.");
        } else {
            log::info!("no stored crash found, clean boot.");
        }
    }
}
