//! Display device enumeration and module lifecycle.

use crate::sim;
use crate::types::{Device, DisplayResult};

pub fn init() {
    sim::init();
}

pub fn deinit() -> DisplayResult<()> {
    sim::deinit()
}

pub fn get_device_count() -> DisplayResult<usize> {
    sim::device_count()
}

pub fn get_device(index: u8) -> DisplayResult<Device> {
    sim::get_device(index)
}

pub fn set_brightness(display_id: u8, percent: u8) -> DisplayResult<()> {
    sim::set_brightness(display_id, percent)
}

pub fn get_brightness(display_id: u8) -> DisplayResult<u8> {
    sim::get_brightness(display_id)
}

/// Enable or disable the vsync callback for `display_id`. Passing
/// `cb: None` disables without changing `enabled`'s stored callback.
pub fn set_vsync<F>(display_id: u8, enabled: bool, cb: Option<F>) -> DisplayResult<()>
where
    F: Fn(u8, u64) + Send + Sync + 'static,
{
    sim::set_vsync(display_id, enabled, cb)
}

pub fn commit(display_id: u8) -> DisplayResult<()> {
    sim::commit(display_id)
}
