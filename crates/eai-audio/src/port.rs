//! Port enumeration.

use crate::sim;
use crate::types::{AudioResult, Direction, Port, PortType};

pub fn port_count() -> usize {
    sim::port_count()
}

pub fn get_port(index: u8) -> AudioResult<Port> {
    sim::port(index)
}

pub fn find_port(port_type: PortType, direction: Direction) -> AudioResult<Port> {
    sim::find_port(port_type, direction)
}
