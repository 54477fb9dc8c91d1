//! Polling-mode event reads.

use crate::sim;
use crate::types::{Event, InputResult};

pub fn read(_timeout_ms: u32) -> InputResult<Event> {
    sim::read()
}
