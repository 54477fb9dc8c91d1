//! Simulation backend: a fake accelerometer and temperature sensor,
//! grounded on `lib/eai_sensor/src/posix/sensor.c`.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, OnceLock};

use crate::types::{Device, SensorData, SensorError, SensorResult, SensorType};

pub const TEST_DATA_MAX: usize = 64;

struct State {
    initialized: bool,
    devices: Vec<Device>,
    busy_devices: HashSet<u8>,
    test_data: VecDeque<SensorData>,
}

fn default_devices() -> Vec<Device> {
    vec![
        Device {
            id: 0,
            name: "accel".into(),
            sensor_type: SensorType::Accel,
            range_min: -16_000,
            range_max: 16_000,
            resolution: 1,
            max_rate_hz: 400,
        },
        Device {
            id: 1,
            name: "temp".into(),
            sensor_type: SensorType::Temperature,
            range_min: -40_000,
            range_max: 125_000,
            resolution: 10,
            max_rate_hz: 10,
        },
    ]
}

fn fresh_state(initialized: bool) -> State {
    State {
        initialized,
        devices: if initialized { default_devices() } else { Vec::new() },
        busy_devices: HashSet::new(),
        test_data: VecDeque::new(),
    }
}

fn state() -> &'static Mutex<State> {
    static STATE: OnceLock<Mutex<State>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(fresh_state(false)))
}

pub fn init() {
    *state().lock().unwrap_or_else(|e| e.into_inner()) = fresh_state(true);
}

pub fn deinit() -> SensorResult<()> {
    let mut guard = state().lock().map_err(|_| SensorError::InvalidParameter)?;
    if !guard.initialized {
        return Err(SensorError::InvalidParameter);
    }
    guard.busy_devices.clear();
    guard.initialized = false;
    Ok(())
}

fn require_init(guard: &State) -> SensorResult<()> {
    if guard.initialized {
        Ok(())
    } else {
        Err(SensorError::InvalidParameter)
    }
}

pub fn device_count() -> SensorResult<usize> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    Ok(guard.devices.len())
}

pub fn get_device(index: u8) -> SensorResult<Device> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    guard
        .devices
        .get(index as usize)
        .cloned()
        .ok_or(SensorError::InvalidParameter)
}

pub fn find_device(sensor_type: SensorType) -> SensorResult<Device> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    guard
        .devices
        .iter()
        .find(|d| d.sensor_type == sensor_type)
        .cloned()
        .ok_or(SensorError::NotFound)
}

/// Claim `device_id` exclusively for a session. Errors `Busy` if the
/// device already has an open session.
pub fn claim_device(device_id: u8) -> SensorResult<()> {
    let mut guard = state().lock().map_err(|_| SensorError::InvalidParameter)?;
    require_init(&guard)?;
    if !guard.devices.iter().any(|d| d.id == device_id) {
        return Err(SensorError::NotFound);
    }
    if guard.busy_devices.contains(&device_id) {
        return Err(SensorError::Busy);
    }
    guard.busy_devices.insert(device_id);
    Ok(())
}

pub fn release_device(device_id: u8) {
    if let Ok(mut guard) = state().lock() {
        guard.busy_devices.remove(&device_id);
    }
}

/// Pop up to `count` queued readings matching `device_id`, in injection
/// order, skipping (and discarding) readings for other devices the way
/// the original's single shared ring buffer does.
pub fn drain_for_device(device_id: u8, count: usize) -> Vec<SensorData> {
    let mut guard = state().lock().unwrap_or_else(|e| e.into_inner());
    let mut out = Vec::new();
    while out.len() < count {
        match guard.test_data.pop_front() {
            Some(data) if data.device_id == device_id => out.push(data),
            Some(_) => continue,
            None => break,
        }
    }
    out
}

pub fn test_inject_data(data: SensorData) {
    let mut guard = state().lock().unwrap_or_else(|e| e.into_inner());
    if guard.test_data.len() < TEST_DATA_MAX {
        guard.test_data.push_back(data);
    }
}

pub fn test_reset() {
    *state().lock().unwrap_or_else(|e| e.into_inner()) = fresh_state(false);
}
