//! Stream lifecycle: open/close/start/pause/write/read/position.
//!
//! Output streams are backed by a mixer slot (multiplexing is allowed:
//! several output streams may share a port through the mixer). Input
//! streams and non-mixer-backed streams claim their port exclusively,
//! returning busy if it's already open — the mixer is the one subsystem
//! in this module that explicitly supports multiplexing.

use crate::runtime;
use crate::sim;
use crate::types::{AudioConfig, AudioError, AudioResult, Direction};

pub struct Stream {
    port_id: u8,
    direction: Direction,
    config: AudioConfig,
    mixer_slot: Option<u8>,
    started: bool,
    position_frames: u64,
}

impl Stream {
    /// Open a stream on `port_id`. Output streams get a mixer slot;
    /// input streams claim the port exclusively.
    pub fn open(port_id: u8, config: AudioConfig) -> AudioResult<Self> {
        let port = sim::port(port_id)?;

        let mixer_slot = match port.direction {
            Direction::Output => Some(runtime::with_mixer(|m| m.slot_open())??),
            Direction::Input => {
                runtime::try_claim_port(port_id)?;
                None
            }
        };

        Ok(Self {
            port_id,
            direction: port.direction,
            config,
            mixer_slot,
            started: false,
            position_frames: 0,
        })
    }

    pub fn start(&mut self) -> AudioResult<()> {
        self.started = true;
        Ok(())
    }

    pub fn pause(&mut self) -> AudioResult<()> {
        self.started = false;
        Ok(())
    }

    /// Write interleaved samples to an output stream.
    pub fn write(&mut self, data: &[i16], frames: u32) -> AudioResult<u32> {
        if self.direction != Direction::Output {
            return Err(AudioError::NotSupported);
        }
        if !self.started {
            return Err(AudioError::InvalidParameter);
        }
        let slot = self.mixer_slot.ok_or(AudioError::NotSupported)?;
        let written = runtime::with_mixer(|m| m.write(slot, data, frames))?;
        self.position_frames += written as u64;
        Ok(written)
    }

    /// Read frames from an input stream. The simulation backend has no
    /// live capture path, so this always returns silence up to the
    /// requested frame count — enough for control-plane and lifecycle
    /// tests that don't exercise a physical microphone.
    pub fn read(&mut self, out: &mut [i16], frames: u32) -> AudioResult<u32> {
        if self.direction != Direction::Input {
            return Err(AudioError::NotSupported);
        }
        if !self.started {
            return Err(AudioError::InvalidParameter);
        }
        let channels = self.config.channels.channel_count();
        let n = (frames * channels).min(out.len() as u32) as usize;
        out[..n].iter_mut().for_each(|s| *s = 0);
        self.position_frames += frames as u64;
        Ok(frames)
    }

    pub fn position(&self) -> u64 {
        self.position_frames
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        match self.mixer_slot {
            Some(slot) => {
                let _ = runtime::with_mixer(|m| m.slot_close(slot));
            }
            None => runtime::release_port(self.port_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::MixerConfig;
    use crate::sim;
    use crate::types::{AudioFormat, ChannelMask, PortType};

    fn setup() {
        sim::test_reset();
        runtime::deinit();
        runtime::init(MixerConfig {
            sample_rate: 16_000,
            channels: 1,
            period_frames: 64,
            hw_write: Box::new(|_| {}),
        })
        .unwrap();
    }

    fn cfg() -> AudioConfig {
        AudioConfig {
            sample_rate: 16_000,
            format: AudioFormat::PcmS16Le,
            channels: ChannelMask::Mono,
            frame_count: 64,
        }
    }

    #[test]
    fn output_streams_can_multiplex_through_mixer() {
        setup();
        let speaker = sim::find_port(PortType::Speaker, Direction::Output)
            .unwrap()
            .id;
        let a = Stream::open(speaker, cfg()).unwrap();
        let b = Stream::open(speaker, cfg()).unwrap();
        drop(a);
        drop(b);
    }

    #[test]
    fn input_stream_is_exclusive() {
        setup();
        let mic = sim::find_port(PortType::Mic, Direction::Input).unwrap().id;
        let _a = Stream::open(mic, cfg()).unwrap();
        assert_eq!(Stream::open(mic, cfg()).err(), Some(AudioError::Busy));
    }

    #[test]
    fn write_to_unstarted_stream_is_invalid() {
        setup();
        let speaker = sim::find_port(PortType::Speaker, Direction::Output)
            .unwrap()
            .id;
        let mut s = Stream::open(speaker, cfg()).unwrap();
        let data = vec![0i16; 64];
        assert_eq!(s.write(&data, 64).err(), Some(AudioError::InvalidParameter));
    }

    #[test]
    fn reading_from_output_stream_is_not_supported() {
        setup();
        let speaker = sim::find_port(PortType::Speaker, Direction::Output)
            .unwrap()
            .id;
        let mut s = Stream::open(speaker, cfg()).unwrap();
        s.start().unwrap();
        let mut buf = [0i16; 64];
        assert_eq!(s.read(&mut buf, 64).err(), Some(AudioError::NotSupported));
    }
}
