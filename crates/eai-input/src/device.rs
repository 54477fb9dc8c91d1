//! Input device enumeration and module lifecycle.

use crate::sim;
use crate::types::{Device, DeviceType, Event, InputResult};

/// Initialize the module. `callback` receives events synchronously as
/// they are injected; pass `None` to poll via [`crate::read`] instead.
pub fn init<F>(callback: Option<F>)
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    sim::init(callback)
}

pub fn deinit() -> InputResult<()> {
    sim::deinit()
}

pub fn get_device_count() -> InputResult<usize> {
    sim::device_count()
}

pub fn get_device(index: u8) -> InputResult<Device> {
    sim::get_device(index)
}

pub fn find_device(device_type: DeviceType) -> InputResult<Device> {
    sim::find_device(device_type)
}
