//! Sensor hardware abstraction: device enumeration and exclusive
//! sessions, backed by an injectable fake accel/temperature simulation.

#![forbid(unsafe_code)]

mod device;
mod session;
#[cfg(feature = "sim")]
mod sim;
mod types;

pub use device::{deinit, find_device, get_device, get_device_count, init};
pub use session::Session;
pub use types::{
    Device, Reading, SensorData, SensorError, SensorResult, SensorType, SessionConfig,
};

#[cfg(feature = "sim")]
pub use sim::test_inject_data;
#[cfg(feature = "sim")]
pub use sim::test_reset;
