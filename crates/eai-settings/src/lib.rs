//! Tiny key/value persistence contract.
//!
//! This crate exists only so `wifi-prov` has somewhere to persist
//! `wifi_prov/ssid`, `wifi_prov/psk`, `wifi_prov/sec`. Key/value
//! persistence is a platform collaborator's job (NVS flash, a settings
//! subsystem, ...), not something this workspace implements from
//! scratch. This crate defines the contract plus an in-memory
//! implementation for native builds and tests.

#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::Mutex;

/// Outcome of a settings operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsStatus {
    Ok,
    NotPresent,
    InvalidParameter,
    Error,
}

/// Get/set/delete contract for a byte-value key/value store.
///
/// Implementations need not be fast or durable across power loss; the only
/// requirement from callers (`wifi-prov`) is that a `set` is visible to a
/// subsequent `get` on the same store instance.
pub trait SettingsStore: Send + Sync {
    /// Read a value into `out`, returning the number of bytes copied.
    /// Returns `NotPresent` if the key has never been set or was deleted.
    fn get(&self, key: &str, out: &mut [u8]) -> Result<usize, SettingsStatus>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), SettingsStatus>;

    /// Remove a key. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), SettingsStatus>;
}

/// In-memory settings store — the "native/simulation backend" for this
/// contract. Not persisted across process restarts.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str, out: &mut [u8]) -> Result<usize, SettingsStatus> {
        if key.is_empty() {
            return Err(SettingsStatus::InvalidParameter);
        }
        let values = self.values.lock().map_err(|_| SettingsStatus::Error)?;
        match values.get(key) {
            Some(v) => {
                let n = v.len().min(out.len());
                out[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(SettingsStatus::NotPresent),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), SettingsStatus> {
        if key.is_empty() {
            return Err(SettingsStatus::InvalidParameter);
        }
        let mut values = self.values.lock().map_err(|_| SettingsStatus::Error)?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), SettingsStatus> {
        if key.is_empty() {
            return Err(SettingsStatus::InvalidParameter);
        }
        let mut values = self.values.lock().map_err(|_| SettingsStatus::Error)?;
        values.remove(key);
        Ok(())
    }
}
