//! WiFi provisioning: a state machine, wire codecs for the provisioning
//! transport, credential persistence, and the orchestrator wiring them
//! to a radio and transport collaborator.

#![forbid(unsafe_code)]

mod cred;
mod prov;
mod radio;
mod sm;
mod transport;
mod types;
mod wire;

pub use cred::CredentialStore;
pub use prov::Provisioner;
pub use radio::{FakeWifiRadio, WifiRadio};
pub use sm::StateMachine;
pub use transport::{ProvisioningTransport, RecordingTransport};
pub use types::{
    Credentials, ProvError, ProvEvent, ProvResult, ProvState, ScanResult, Security,
    PSK_MAX_LEN, SSID_MAX_LEN,
};
pub use wire::{
    decode_credentials, decode_scan_result, decode_status, encode_credentials,
    encode_scan_result, encode_status,
};
