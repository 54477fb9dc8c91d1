//! Process-wide audio module lifecycle: owns the mixer singleton and the
//! set of ports with an exclusively-open stream.
//!
//! `init` after `deinit` must fully reset state, the same way every HAL
//! module in this workspace treats its lifecycle (see [`eai_display`],
//! [`eai_input`], [`eai_sensor`]).

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use crate::mixer::{Mixer, MixerConfig};
use crate::types::{AudioError, AudioResult};

struct Module {
    mixer: Option<Mixer>,
    busy_ports: HashSet<u8>,
}

fn module() -> &'static Mutex<Option<Module>> {
    static MODULE: OnceLock<Mutex<Option<Module>>> = OnceLock::new();
    MODULE.get_or_init(|| Mutex::new(None))
}

/// Initialize the audio module with a mixer backing its output ports.
/// Calling this again after [`deinit`] fully resets internal state.
pub fn init(mixer_config: MixerConfig) -> AudioResult<()> {
    let mixer = Mixer::new(mixer_config)?;
    let mut guard = module().lock().map_err(|_| AudioError::Error)?;
    *guard = Some(Module {
        mixer: Some(mixer),
        busy_ports: HashSet::new(),
    });
    Ok(())
}

pub fn deinit() {
    let mut guard = module().lock().unwrap_or_else(|e| e.into_inner());
    *guard = None;
}

pub fn with_mixer<R>(f: impl FnOnce(&Mixer) -> AudioResult<R>) -> AudioResult<R> {
    let guard = module().lock().map_err(|_| AudioError::Error)?;
    match guard.as_ref().and_then(|m| m.mixer.as_ref()) {
        Some(mixer) => f(mixer),
        None => Err(AudioError::Error),
    }
}

pub fn try_claim_port(port_id: u8) -> AudioResult<()> {
    let mut guard = module().lock().map_err(|_| AudioError::Error)?;
    let m = guard.as_mut().ok_or(AudioError::Error)?;
    if m.busy_ports.contains(&port_id) {
        return Err(AudioError::Busy);
    }
    m.busy_ports.insert(port_id);
    Ok(())
}

pub fn release_port(port_id: u8) {
    if let Ok(mut guard) = module().lock() {
        if let Some(m) = guard.as_mut() {
            m.busy_ports.remove(&port_id);
        }
    }
}
