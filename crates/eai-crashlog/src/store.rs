//! The external coredump store collaborator and its in-memory stand-in.
//!
//! On the original backend this is a flash-backed coredump partition
//! queried and copied through a command interface; from the crash-log
//! component's perspective it is write-only except for query/copy.

use std::sync::Mutex;

use crate::types::{CrashError, CrashResult};

/// Query/copy/erase contract for wherever a coredump actually lives.
pub trait CoredumpStore: Send + Sync {
    /// Whether a valid coredump is currently stored.
    fn has_dump(&self) -> bool;

    /// Total size of the stored dump, in bytes. Only meaningful when
    /// [`CoredumpStore::has_dump`] is true.
    fn size(&self) -> usize;

    /// Copy up to `buf.len()` bytes starting at `offset`, returning the
    /// number of bytes actually copied. Returns `Io` if the underlying
    /// medium fails partway through.
    fn copy(&self, offset: usize, buf: &mut [u8]) -> CrashResult<usize>;

    /// Erase the stored dump.
    fn erase(&self) -> CrashResult<()>;
}

/// In-memory coredump store — the "native/simulation backend" for this
/// contract. A real platform wires a flash-partition-backed store
/// instead; tests and demos inject dumps via [`MemoryCoredumpStore::store`].
#[derive(Default)]
pub struct MemoryCoredumpStore {
    dump: Mutex<Option<Vec<u8>>>,
}

impl MemoryCoredumpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a dump, as if a crash had just produced one.
    pub fn store(&self, data: Vec<u8>) {
        *self.dump.lock().unwrap_or_else(|e| e.into_inner()) = Some(data);
    }
}

impl CoredumpStore for MemoryCoredumpStore {
    fn has_dump(&self) -> bool {
        self.dump
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn size(&self) -> usize {
        self.dump
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn copy(&self, offset: usize, buf: &mut [u8]) -> CrashResult<usize> {
        let guard = self.dump.lock().unwrap_or_else(|e| e.into_inner());
        let dump = guard.as_ref().ok_or(CrashError::NotFound)?;
        if offset >= dump.len() {
            return Ok(0);
        }
        let n = buf.len().min(dump.len() - offset);
        buf[..n].copy_from_slice(&dump[offset..offset + n]);
        Ok(n)
    }

    fn erase(&self) -> CrashResult<()> {
        *self.dump.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_has_no_dump() {
        let store = MemoryCoredumpStore::new();
        assert!(!store.has_dump());
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn stored_dump_is_queryable_and_copyable() {
        let store = MemoryCoredumpStore::new();
        store.store(vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(store.has_dump());
        assert_eq!(store.size(), 4);
        let mut buf = [0u8; 2];
        assert_eq!(store.copy(1, &mut buf).unwrap(), 2);
        assert_eq!(buf, [0xad, 0xbe]);
    }

    #[test]
    fn copy_past_end_returns_zero() {
        let store = MemoryCoredumpStore::new();
        store.store(vec![1, 2, 3]);
        let mut buf = [0u8; 4];
        assert_eq!(store.copy(3, &mut buf).unwrap(), 0);
    }

    #[test]
    fn erase_clears_the_dump() {
        let store = MemoryCoredumpStore::new();
        store.store(vec![1, 2, 3]);
        store.erase().unwrap();
        assert!(!store.has_dump());
    }
}
