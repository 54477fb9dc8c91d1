//! Credential persistence via the `eai-settings` contract, with an
//! in-memory cache so `exists`/`load` don't round-trip to the store on
//! every call once loaded.

use std::sync::{Arc, Mutex};

use eai_settings::SettingsStore;

use crate::types::{Credentials, ProvError, ProvResult, SSID_MAX_LEN};

const KEY_SSID: &str = "wifi_prov/ssid";
const KEY_PSK: &str = "wifi_prov/psk";
const KEY_SEC: &str = "wifi_prov/sec";

pub struct CredentialStore {
    settings: Arc<dyn SettingsStore>,
    cache: Mutex<Option<Credentials>>,
}

impl CredentialStore {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            cache: Mutex::new(None),
        }
    }

    fn load_from_storage(&self) -> Credentials {
        let mut ssid = vec![0u8; SSID_MAX_LEN];
        let ssid_len = self.settings.get(KEY_SSID, &mut ssid).unwrap_or(0);
        ssid.truncate(ssid_len);

        let mut psk = vec![0u8; crate::types::PSK_MAX_LEN];
        let psk_len = self.settings.get(KEY_PSK, &mut psk).unwrap_or(0);
        psk.truncate(psk_len);

        let mut sec = [0u8; 1];
        let security_code = if self.settings.get(KEY_SEC, &mut sec).is_ok() {
            sec[0]
        } else {
            0
        };

        if !ssid.is_empty() {
            log::info!("loaded stored credentials (SSID len={})", ssid.len());
        }

        Credentials {
            ssid,
            psk,
            security_code,
        }
    }

    fn cached(&self) -> Credentials {
        let mut guard = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            *guard = Some(self.load_from_storage());
        }
        guard.clone().unwrap()
    }

    /// Persist `cred` both in memory and to the settings store. Erasure
    /// of stale state is not required; a failed write still leaves the
    /// in-memory copy authoritative.
    pub fn store(&self, cred: &Credentials) -> ProvResult<()> {
        if cred.ssid.is_empty() || cred.ssid.len() > SSID_MAX_LEN {
            return Err(ProvError::InvalidParameter);
        }

        *self.cache.lock().unwrap_or_else(|e| e.into_inner()) = Some(cred.clone());

        if self.settings.set(KEY_SSID, &cred.ssid).is_err() {
            log::warn!("failed to persist SSID (in-memory OK)");
        }
        if !cred.psk.is_empty() && self.settings.set(KEY_PSK, &cred.psk).is_err() {
            log::warn!("failed to persist PSK (in-memory OK)");
        }
        if self
            .settings
            .set(KEY_SEC, &[cred.security_code])
            .is_err()
        {
            log::warn!("failed to persist security (in-memory OK)");
        }

        log::info!("credentials stored (SSID len={})", cred.ssid.len());
        Ok(())
    }

    pub fn load(&self) -> ProvResult<Credentials> {
        let cred = self.cached();
        if cred.ssid.is_empty() {
            return Err(ProvError::NotFound);
        }
        Ok(cred)
    }

    pub fn erase(&self) {
        *self.cache.lock().unwrap_or_else(|e| e.into_inner()) = Some(Credentials::default());
        let _ = self.settings.delete(KEY_SSID);
        let _ = self.settings.delete(KEY_PSK);
        let _ = self.settings.delete(KEY_SEC);
        log::info!("credentials erased");
    }

    pub fn exists(&self) -> bool {
        !self.cached().ssid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eai_settings::MemorySettingsStore;
    use crate::types::Security;

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemorySettingsStore::new()))
    }

    fn cred(ssid: &str, psk: &str) -> Credentials {
        Credentials {
            ssid: ssid.as_bytes().to_vec(),
            psk: psk.as_bytes().to_vec(),
            security_code: Security::Wpa2Psk as u8,
        }
    }

    #[test]
    fn no_cred_on_clean_boot() {
        assert!(!store().exists());
    }

    #[test]
    fn store_then_load_round_trips() {
        let s = store();
        s.store(&cred("TestNetwork", "password123")).unwrap();
        assert!(s.exists());
        let loaded = s.load().unwrap();
        assert_eq!(loaded.ssid, b"TestNetwork");
        assert_eq!(loaded.psk, b"password123");
    }

    #[test]
    fn erase_clears_existence() {
        let s = store();
        s.store(&cred("ToErase", "pass")).unwrap();
        s.erase();
        assert!(!s.exists());
    }

    #[test]
    fn load_when_empty_is_not_found() {
        assert_eq!(store().load(), Err(ProvError::NotFound));
    }

    #[test]
    fn overwrite_replaces_prior_credentials() {
        let s = store();
        s.store(&cred("First", "pass1")).unwrap();
        s.store(&cred("Second", "pass2")).unwrap();
        assert_eq!(s.load().unwrap().ssid, b"Second");
    }
}
