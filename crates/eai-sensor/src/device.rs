//! Sensor device enumeration and module lifecycle.

use crate::sim;
use crate::types::{Device, SensorResult, SensorType};

pub fn init() {
    sim::init();
}

pub fn deinit() -> SensorResult<()> {
    sim::deinit()
}

pub fn get_device_count() -> SensorResult<usize> {
    sim::device_count()
}

pub fn get_device(index: u8) -> SensorResult<Device> {
    sim::get_device(index)
}

pub fn find_device(sensor_type: SensorType) -> SensorResult<Device> {
    sim::find_device(sensor_type)
}
