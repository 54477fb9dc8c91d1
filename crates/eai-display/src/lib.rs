//! Display hardware abstraction: device enumeration and layer
//! compositing, backed by a fake framebuffer in simulation.

#![forbid(unsafe_code)]

mod device;
mod layer;
#[cfg(feature = "sim")]
mod sim;
mod types;

pub use device::{
    commit, deinit, get_brightness, get_device, get_device_count, init, set_brightness, set_vsync,
};
pub use layer::Layer;
pub use types::{Device, DisplayError, DisplayResult, LayerConfig, PixelFormat};

#[cfg(feature = "sim")]
pub use sim::{test_fire_vsync, test_get_commit_count, test_get_framebuffer, test_reset};
