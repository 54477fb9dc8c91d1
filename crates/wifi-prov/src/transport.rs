//! Outward-facing notification surface for the provisioning UI (a BLE
//! GATT service on the original backend, a phone app's transport of
//! choice on others). The orchestrator only needs to push status and
//! scan-result notifications; receiving scan triggers, credentials, and
//! factory-reset requests is the transport's job to decode and forward
//! into [`crate::Provisioner`]'s `on_*` entry points.

use std::sync::Mutex;

use crate::types::{ProvResult, ProvState, ScanResult};

pub trait ProvisioningTransport: Send + Sync {
    fn notify_status(&self, state: ProvState, ip: [u8; 4]) -> ProvResult<()>;

    fn notify_scan_result(&self, result: &ScanResult) -> ProvResult<()>;
}

/// Records every notification for inspection by tests; never fails.
#[derive(Default)]
pub struct RecordingTransport {
    statuses: Mutex<Vec<(ProvState, [u8; 4])>>,
    scan_results: Mutex<Vec<ScanResult>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<(ProvState, [u8; 4])> {
        self.statuses.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn scan_results(&self) -> Vec<ScanResult> {
        self.scan_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ProvisioningTransport for RecordingTransport {
    fn notify_status(&self, state: ProvState, ip: [u8; 4]) -> ProvResult<()> {
        self.statuses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((state, ip));
        Ok(())
    }

    fn notify_scan_result(&self, result: &ScanResult) -> ProvResult<()> {
        self.scan_results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(result.clone());
        Ok(())
    }
}
