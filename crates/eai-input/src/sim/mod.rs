//! Simulation backend: a fake touchscreen plus two buttons, grounded on
//! `lib/eai_input/src/posix/input.c`. Events are injected via
//! [`test_inject_event`] and either delivered synchronously to a
//! registered callback or queued for [`read`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

use crate::types::{Device, DeviceType, Event, InputError, InputResult};

pub const EVENT_QUEUE_MAX: usize = 64;

type EventCb = Arc<dyn Fn(&Event) + Send + Sync>;

struct State {
    initialized: bool,
    devices: Vec<Device>,
    callback: Option<EventCb>,
    queue: VecDeque<Event>,
}

fn default_devices() -> Vec<Device> {
    vec![
        Device {
            id: 0,
            name: "touch".into(),
            device_type: DeviceType::Touch,
            x_min: 0,
            x_max: 319,
            y_min: 0,
            y_max: 239,
        },
        Device {
            id: 1,
            name: "btn_a".into(),
            device_type: DeviceType::Button,
            x_min: 0,
            x_max: 0,
            y_min: 0,
            y_max: 0,
        },
        Device {
            id: 2,
            name: "btn_b".into(),
            device_type: DeviceType::Button,
            x_min: 0,
            x_max: 0,
            y_min: 0,
            y_max: 0,
        },
    ]
}

fn fresh_state(initialized: bool) -> State {
    State {
        initialized,
        devices: if initialized { default_devices() } else { Vec::new() },
        callback: None,
        queue: VecDeque::new(),
    }
}

fn state() -> &'static Mutex<State> {
    static STATE: OnceLock<Mutex<State>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(fresh_state(false)))
}

/// Initialize the module, optionally delivering events synchronously to
/// `callback` instead of queuing them for [`read`].
pub fn init<F>(callback: Option<F>)
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    let mut guard = state().lock().unwrap_or_else(|e| e.into_inner());
    *guard = fresh_state(true);
    guard.callback = callback.map(|f| Arc::new(f) as EventCb);
}

pub fn deinit() -> InputResult<()> {
    let mut guard = state().lock().map_err(|_| InputError::InvalidParameter)?;
    if !guard.initialized {
        return Err(InputError::InvalidParameter);
    }
    guard.callback = None;
    guard.initialized = false;
    Ok(())
}

fn require_init(guard: &State) -> InputResult<()> {
    if guard.initialized {
        Ok(())
    } else {
        Err(InputError::InvalidParameter)
    }
}

pub fn device_count() -> InputResult<usize> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    Ok(guard.devices.len())
}

pub fn get_device(index: u8) -> InputResult<Device> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    guard
        .devices
        .get(index as usize)
        .cloned()
        .ok_or(InputError::InvalidParameter)
}

pub fn find_device(device_type: DeviceType) -> InputResult<Device> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    guard
        .devices
        .iter()
        .find(|d| d.device_type == device_type)
        .cloned()
        .ok_or(InputError::NotFound)
}

/// Pop the oldest queued event. Returns `WouldBlock` if none is
/// available — this backend never actually blocks regardless of
/// `timeout_ms`, since injected events in callback mode never reach the
/// queue.
pub fn read() -> InputResult<Event> {
    let mut guard = state().lock().unwrap();
    require_init(&guard)?;
    guard.queue.pop_front().ok_or(InputError::WouldBlock)
}

/// Deliver `event` to the registered callback if one exists, otherwise
/// queue it for [`read`]. Test-only, per the original's POSIX stub.
pub fn test_inject_event(event: Event) {
    let callback = {
        let mut guard = state().lock().unwrap_or_else(|e| e.into_inner());
        if guard.initialized {
            if let Some(cb) = guard.callback.clone() {
                Some(cb)
            } else {
                if guard.queue.len() < EVENT_QUEUE_MAX {
                    guard.queue.push_back(event);
                }
                None
            }
        } else {
            None
        }
    };
    if let Some(cb) = callback {
        cb(&event);
    }
}

pub fn test_reset() {
    *state().lock().unwrap_or_else(|e| e.into_inner()) = fresh_state(false);
}
