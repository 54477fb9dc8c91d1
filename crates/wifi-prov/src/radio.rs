//! WiFi radio collaborator: connect/disconnect/scan/get-ip, abstracted
//! behind a trait so the orchestrator never depends on a concrete
//! driver. Scanning is synchronous here — the fake radio has nothing to
//! wait on — but a real backend may still deliver results as they
//! arrive by calling `on_result` incrementally before returning.

use std::sync::Mutex;

use crate::types::{Credentials, ProvResult, ScanResult};

pub trait WifiRadio: Send + Sync {
    /// Scan for access points, calling `on_result` once per result
    /// found, then returning once the scan completes.
    fn scan(&self, on_result: &mut dyn FnMut(&ScanResult)) -> ProvResult<()>;

    fn connect(&self, cred: &Credentials) -> ProvResult<()>;

    fn disconnect(&self) -> ProvResult<()>;

    fn get_ip(&self) -> [u8; 4];

    fn is_connected(&self) -> bool;
}

/// In-memory fake radio for tests and native builds: a fixed scan
/// result list and a connect outcome the test configures up front.
pub struct FakeWifiRadio {
    scan_results: Vec<ScanResult>,
    connect_should_fail: bool,
    state: Mutex<FakeState>,
}

struct FakeState {
    connected: bool,
    ip: [u8; 4],
}

impl FakeWifiRadio {
    pub fn new(scan_results: Vec<ScanResult>, connect_should_fail: bool) -> Self {
        Self {
            scan_results,
            connect_should_fail,
            state: Mutex::new(FakeState {
                connected: false,
                ip: [0, 0, 0, 0],
            }),
        }
    }
}

impl WifiRadio for FakeWifiRadio {
    fn scan(&self, on_result: &mut dyn FnMut(&ScanResult)) -> ProvResult<()> {
        for result in &self.scan_results {
            on_result(result);
        }
        Ok(())
    }

    fn connect(&self, _cred: &Credentials) -> ProvResult<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if self.connect_should_fail {
            state.connected = false;
            return Err(crate::types::ProvError::Error);
        }
        state.connected = true;
        state.ip = [10, 0, 0, 2];
        Ok(())
    }

    fn disconnect(&self) -> ProvResult<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.connected = false;
        state.ip = [0, 0, 0, 0];
        Ok(())
    }

    fn get_ip(&self) -> [u8; 4] {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).ip
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Security;

    #[test]
    fn fake_radio_delivers_configured_scan_results() {
        let radio = FakeWifiRadio::new(
            vec![ScanResult {
                ssid: b"AP1".to_vec(),
                rssi: -40,
                security: Security::Wpa2Psk,
                channel: 1,
            }],
            false,
        );
        let mut seen = Vec::new();
        radio.scan(&mut |r| seen.push(r.clone())).unwrap();
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn successful_connect_reports_connected_with_an_ip() {
        let radio = FakeWifiRadio::new(Vec::new(), false);
        let cred = Credentials {
            ssid: b"net".to_vec(),
            psk: b"pass".to_vec(),
            security_code: 2,
        };
        radio.connect(&cred).unwrap();
        assert!(radio.is_connected());
        assert_ne!(radio.get_ip(), [0, 0, 0, 0]);
    }

    #[test]
    fn failing_connect_leaves_radio_disconnected() {
        let radio = FakeWifiRadio::new(Vec::new(), true);
        let cred = Credentials {
            ssid: b"net".to_vec(),
            psk: b"pass".to_vec(),
            security_code: 2,
        };
        assert!(radio.connect(&cred).is_err());
        assert!(!radio.is_connected());
    }
}
