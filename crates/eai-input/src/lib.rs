//! Input hardware abstraction: device enumeration and event delivery,
//! backed by a fake touch/button simulation.

#![forbid(unsafe_code)]

mod device;
mod event;
#[cfg(feature = "sim")]
mod sim;
mod types;

pub use device::{deinit, find_device, get_device, get_device_count, init};
pub use event::read;
pub use types::{Device, DeviceType, Event, EventType, InputError, InputResult};

#[cfg(feature = "sim")]
pub use sim::test_inject_event;
#[cfg(feature = "sim")]
pub use sim::test_reset;
