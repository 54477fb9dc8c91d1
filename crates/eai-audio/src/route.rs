//! Source-to-sink routing table.

use crate::sim;
use crate::types::{AudioResult, Route};

pub fn set_route(source_port_id: u8, sink_port_id: u8) -> AudioResult<()> {
    sim::set_route(source_port_id, sink_port_id)
}

pub fn route_count() -> usize {
    sim::route_count()
}

pub fn get_route(index: u8) -> AudioResult<Route> {
    sim::route(index)
}
