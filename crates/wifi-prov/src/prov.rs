//! Orchestrator wiring the state machine, credential persistence, the
//! radio collaborator, and the notification transport together, the
//! way `wifi_prov.c` wires `wifi_prov_sm`, `wifi_prov_cred`,
//! `wifi_prov_wifi`, and `wifi_prov_ble`.
//!
//! Credential storage and WiFi connect run on a work-queue worker
//! rather than the caller's thread, so a transport's `on_write` handler
//! never blocks on a network operation.

use std::sync::{Arc, Mutex};

use eai_osal::{DelayedWork, Work, WorkQueue};
use eai_settings::SettingsStore;

use crate::cred::CredentialStore;
use crate::radio::WifiRadio;
use crate::sm::StateMachine;
use crate::transport::ProvisioningTransport;
use crate::types::{Credentials, ProvError, ProvEvent, ProvResult, ProvState};

const WORKQUEUE_CAPACITY: usize = 4;
const WORKQUEUE_PRIORITY: u8 = 10;
const AUTO_CONNECT_DELAY_MS: u32 = 2000;

pub struct Provisioner {
    sm: Arc<StateMachine>,
    cred: Arc<CredentialStore>,
    radio: Arc<dyn WifiRadio>,
    transport: Arc<dyn ProvisioningTransport>,
    cached_ip: Arc<Mutex<[u8; 4]>>,
    workqueue: Arc<WorkQueue>,
    auto_connect: Mutex<Option<DelayedWork>>,
}

impl Provisioner {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        radio: Arc<dyn WifiRadio>,
        transport: Arc<dyn ProvisioningTransport>,
    ) -> ProvResult<Self> {
        let workqueue = WorkQueue::new("wifi-prov", WORKQUEUE_CAPACITY, WORKQUEUE_PRIORITY)
            .map_err(|_| ProvError::Error)?;
        Ok(Self {
            sm: Arc::new(StateMachine::new(Some(|old: ProvState, new: ProvState| {
                log::info!("state: {old:?} -> {new:?}");
            }))),
            cred: Arc::new(CredentialStore::new(settings)),
            radio,
            transport,
            cached_ip: Arc::new(Mutex::new([0, 0, 0, 0])),
            workqueue: Arc::new(workqueue),
            auto_connect: Mutex::new(None),
        })
    }

    pub fn state(&self) -> ProvState {
        self.sm.state()
    }

    pub fn ip(&self) -> [u8; 4] {
        *self.cached_ip.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Schedule auto-connect from stored credentials if any exist.
    /// Mirrors the original's `CONFIG_WIFI_PROV_AUTO_CONNECT` boot hook.
    pub fn init(&self) {
        if !self.cred.exists() {
            return;
        }
        let sm = self.sm.clone();
        let cred = self.cred.clone();
        let radio = self.radio.clone();
        let work = Work::new(move || {
            let loaded = match cred.load() {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("auto-connect: failed to load credentials: {e:?}");
                    return;
                }
            };
            log::info!("auto-connecting from stored credentials");
            let _ = sm.process_event(ProvEvent::CredentialsRx);
            let _ = sm.process_event(ProvEvent::WifiConnecting);
            if let Err(e) = radio.connect(&loaded) {
                log::warn!("auto-connect request failed: {e:?}");
                let _ = sm.process_event(ProvEvent::WifiFailed);
            }
        });
        *self.auto_connect.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(DelayedWork::schedule(
                self.workqueue.clone(),
                work,
                AUTO_CONNECT_DELAY_MS,
            ));
    }

    /// A scan request came in from the transport. Drives the state
    /// machine through `Scanning` -> `ScanComplete` and forwards every
    /// result to the transport as it's found.
    pub fn on_scan_trigger(&self) -> ProvResult<()> {
        self.sm.process_event(ProvEvent::ScanTrigger)?;
        let transport = self.transport.clone();
        self.radio.scan(&mut |result| {
            let _ = transport.notify_scan_result(result);
        })?;
        self.sm.process_event(ProvEvent::ScanDone)?;
        Ok(())
    }

    /// Credentials came in from the transport. Advances to
    /// `Provisioning` immediately (the caller's thread) and defers the
    /// actual store-and-connect to the work queue.
    pub fn on_credentials_received(&self, cred: Credentials) -> ProvResult<()> {
        self.sm.process_event(ProvEvent::CredentialsRx)?;

        let sm = self.sm.clone();
        let store = self.cred.clone();
        let radio = self.radio.clone();
        let transport = self.transport.clone();
        let work = Work::new(move || {
            let _ = store.store(&cred);
            let _ = sm.process_event(ProvEvent::WifiConnecting);
            if let Err(e) = radio.connect(&cred) {
                log::error!("WiFi connect request failed: {e:?}");
                let _ = sm.process_event(ProvEvent::WifiFailed);
                let _ = transport.notify_status(sm.state(), [0, 0, 0, 0]);
            }
        });
        if self.workqueue.submit(work) != eai_osal::OsalStatus::Ok {
            return Err(ProvError::NotFound);
        }
        Ok(())
    }

    pub fn on_factory_reset_triggered(&self) -> ProvResult<()> {
        let sm = self.sm.clone();
        let cred = self.cred.clone();
        let radio = self.radio.clone();
        let transport = self.transport.clone();
        let cached_ip = self.cached_ip.clone();
        let work = Work::new(move || {
            let _ = sm.process_event(ProvEvent::FactoryReset);
            let _ = radio.disconnect();
            cred.erase();
            *cached_ip.lock().unwrap_or_else(|e| e.into_inner()) = [0, 0, 0, 0];
            let _ = transport.notify_status(ProvState::Idle, [0, 0, 0, 0]);
            log::info!("factory reset complete");
        });
        if self.workqueue.submit(work) != eai_osal::OsalStatus::Ok {
            return Err(ProvError::NotFound);
        }
        Ok(())
    }

    /// The radio reported a connectivity change. Drives the state
    /// machine and refreshes the cached IP, then notifies the
    /// transport of the resulting status.
    pub fn on_wifi_state_changed(&self, connected: bool) -> ProvResult<()> {
        if connected {
            self.sm.process_event(ProvEvent::WifiConnected)?;
            *self.cached_ip.lock().unwrap_or_else(|e| e.into_inner()) = self.radio.get_ip();
        } else {
            let event = match self.sm.state() {
                ProvState::Connecting | ProvState::Provisioning => ProvEvent::WifiFailed,
                _ => ProvEvent::WifiDisconnected,
            };
            self.sm.process_event(event)?;
            *self.cached_ip.lock().unwrap_or_else(|e| e.into_inner()) = [0, 0, 0, 0];
        }
        self.transport.notify_status(self.sm.state(), self.ip())
    }
}
