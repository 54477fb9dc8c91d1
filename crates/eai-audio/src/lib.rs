//! Audio hardware abstraction: port/route/gain control plane, stream
//! lifecycle, and the software mixer backing output streams.

#![forbid(unsafe_code)]

#[cfg(feature = "sim")]
mod gain;
#[cfg(feature = "sim")]
mod mixer;
#[cfg(feature = "sim")]
mod port;
#[cfg(feature = "sim")]
mod route;
#[cfg(feature = "sim")]
mod runtime;
#[cfg(feature = "sim")]
mod sim;
#[cfg(feature = "sim")]
mod stream;
mod types;

#[cfg(feature = "sim")]
pub use gain::{get_gain, set_gain};
#[cfg(feature = "sim")]
pub use mixer::{Mixer, MixerConfig, MAX_CHANNELS, MAX_PERIOD_FRAMES, MAX_SLOTS, VOLUME_MUTE, VOLUME_UNITY};
#[cfg(feature = "sim")]
pub use port::{find_port, get_port, port_count};
#[cfg(feature = "sim")]
pub use route::{get_route, route_count, set_route};
#[cfg(feature = "sim")]
pub use runtime::{deinit as audio_deinit, init as audio_init};
#[cfg(feature = "sim")]
pub use stream::Stream;
pub use types::{
    AudioConfig, AudioError, AudioFormat, AudioResult, ChannelMask, Direction, Gain, Port,
    PortType, Route,
};

#[cfg(feature = "sim")]
pub use sim::test_reset;
