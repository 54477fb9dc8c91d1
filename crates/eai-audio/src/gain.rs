//! Port gain control, in centibels.

use crate::sim;
use crate::types::AudioResult;

pub fn set_gain(port_id: u8, gain_cb: i32) -> AudioResult<()> {
    sim::set_gain(port_id, gain_cb)
}

pub fn get_gain(port_id: u8) -> AudioResult<i32> {
    sim::get_gain(port_id)
}
