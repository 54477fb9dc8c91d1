//! Software mixer: a dedicated thread mixes per-slot ring buffers into one
//! hardware-write callback per period.
//!
//! Grounded closely on `lib/eai_audio/src/mixer.c` (ring sizing, the
//! wait/lock/drain/scale/clip/unlock/write loop, and the short-write
//! producer contract). The mixer owns its thread and semaphore through
//! [`eai_osal`]; the slot table itself is guarded by a plain
//! `std::sync::Mutex` rather than [`eai_osal::Mutex`] because the OSAL
//! mutex is a bare lock/unlock primitive with no data it guards directly
//! — pairing it with the slot table would need an unsafe cell for no
//! benefit over the std type.

use std::sync::{Arc, Mutex};

use eai_osal::{OsalStatus, Semaphore, Thread};

use crate::types::{AudioError, AudioResult};

/// Maximum simultaneous mixer slots.
pub const MAX_SLOTS: usize = 4;
/// Maximum frames in one mixing period.
pub const MAX_PERIOD_FRAMES: u32 = 1024;
/// Maximum channels handled by the mixer.
pub const MAX_CHANNELS: u32 = 2;

/// Q16 fixed-point: `0x10000` is unity gain.
pub const VOLUME_UNITY: u32 = 0x0001_0000;
pub const VOLUME_MUTE: u32 = 0;

fn ring_capacity(max_period_frames: u32, max_channels: u32) -> usize {
    (2 * max_period_frames * max_channels) as usize
}

struct Slot {
    ring: Vec<i16>,
    capacity: usize,
    wr: u64,
    rd: u64,
    volume: u32,
    underruns: u32,
    active: bool,
}

impl Slot {
    fn new(capacity: usize) -> Self {
        Self {
            ring: vec![0; capacity],
            capacity,
            wr: 0,
            rd: 0,
            volume: VOLUME_UNITY,
            underruns: 0,
            active: false,
        }
    }

    fn count(&self) -> u64 {
        self.wr - self.rd
    }

    fn space(&self) -> u64 {
        self.capacity as u64 - self.count()
    }

    fn write(&mut self, data: &[i16]) {
        for &sample in data {
            let idx = (self.wr % self.capacity as u64) as usize;
            self.ring[idx] = sample;
            self.wr += 1;
        }
    }

    fn read(&mut self, out: &mut [i16]) {
        for slot in out.iter_mut() {
            let idx = (self.rd % self.capacity as u64) as usize;
            *slot = self.ring[idx];
            self.rd += 1;
        }
    }
}

/// Mixer configuration: sample rate, channel count, period size, and the
/// callback invoked once per period with the mixed output.
pub struct MixerConfig {
    pub sample_rate: u32,
    pub channels: u32,
    pub period_frames: u32,
    pub hw_write: Box<dyn Fn(&[i16]) + Send + Sync>,
}

struct Shared {
    slots: Mutex<Vec<Slot>>,
    sem: Semaphore,
    running: std::sync::atomic::AtomicBool,
    period_frames: u32,
    channels: u32,
}

/// A running software mixer. Dropping it stops and joins the mixer
/// thread, matching `eai_audio_mixer_deinit`.
pub struct Mixer {
    shared: Arc<Shared>,
    thread: Option<Thread>,
}

impl Mixer {
    pub fn new(config: MixerConfig) -> AudioResult<Self> {
        if config.period_frames == 0 || config.period_frames > MAX_PERIOD_FRAMES {
            return Err(AudioError::InvalidParameter);
        }
        if config.channels == 0 || config.channels > MAX_CHANNELS {
            return Err(AudioError::InvalidParameter);
        }

        let capacity = ring_capacity(MAX_PERIOD_FRAMES, MAX_CHANNELS);
        let slots = (0..MAX_SLOTS).map(|_| Slot::new(capacity)).collect();

        let shared = Arc::new(Shared {
            slots: Mutex::new(slots),
            sem: Semaphore::new(0, 1),
            running: std::sync::atomic::AtomicBool::new(true),
            period_frames: config.period_frames,
            channels: config.channels,
        });

        let period_ms = ((config.period_frames as u64 * 1000) / config.sample_rate.max(1) as u64)
            .max(1) as u32;
        let hw_write = config.hw_write;
        let worker_shared = shared.clone();

        let thread = Thread::spawn("mixer", 20, move || {
            mixer_loop(worker_shared, period_ms, hw_write);
        })
        .map_err(|_| AudioError::Error)?;

        Ok(Self {
            shared,
            thread: Some(thread),
        })
    }

    /// Open a free slot, returning its index.
    pub fn slot_open(&self) -> AudioResult<u8> {
        let mut slots = self.shared.slots.lock().map_err(|_| AudioError::Error)?;
        for (i, slot) in slots.iter_mut().enumerate() {
            if !slot.active {
                slot.active = true;
                slot.wr = 0;
                slot.rd = 0;
                slot.underruns = 0;
                slot.volume = VOLUME_UNITY;
                return Ok(i as u8);
            }
        }
        Err(AudioError::NoMemory)
    }

    pub fn slot_close(&self, slot: u8) -> AudioResult<()> {
        let mut slots = self.shared.slots.lock().map_err(|_| AudioError::Error)?;
        let s = slots.get_mut(slot as usize).ok_or(AudioError::InvalidParameter)?;
        s.active = false;
        s.wr = 0;
        s.rd = 0;
        Ok(())
    }

    /// Write `data` (interleaved samples) to `slot`. Returns the number of
    /// whole frames actually written, short of `frames` if the ring is
    /// full.
    pub fn write(&self, slot: u8, data: &[i16], frames: u32) -> AudioResult<u32> {
        if data.is_empty() || frames == 0 {
            return Err(AudioError::InvalidParameter);
        }
        let channels = self.shared.channels;
        let samples = (frames * channels) as u64;

        let to_write_frames = {
            let mut slots = self.shared.slots.lock().map_err(|_| AudioError::Error)?;
            let s = slots
                .get_mut(slot as usize)
                .filter(|s| s.active)
                .ok_or(AudioError::InvalidParameter)?;

            let space = s.space();
            let mut to_write = samples.min(space);
            to_write -= to_write % channels as u64;
            if to_write > 0 {
                s.write(&data[..to_write as usize]);
            }
            to_write / channels as u64
        };

        self.shared.sem.give();
        Ok(to_write_frames as u32)
    }

    /// Wake the mixer thread without writing new data.
    pub fn kick(&self) {
        self.shared.sem.give();
    }

    pub fn set_volume(&self, slot: u8, volume_q16: u32) -> AudioResult<()> {
        let mut slots = self.shared.slots.lock().map_err(|_| AudioError::Error)?;
        let s = slots.get_mut(slot as usize).ok_or(AudioError::InvalidParameter)?;
        s.volume = volume_q16;
        Ok(())
    }

    pub fn underruns(&self, slot: u8) -> u32 {
        self.shared
            .slots
            .lock()
            .ok()
            .and_then(|slots| slots.get(slot as usize).map(|s| s.underruns))
            .unwrap_or(0)
    }
}

impl Drop for Mixer {
    fn drop(&mut self) {
        self.shared
            .running
            .store(false, std::sync::atomic::Ordering::SeqCst);
        self.shared.sem.give();
        if let Some(thread) = self.thread.take() {
            thread.join(1000);
        }
    }
}

fn mixer_loop(shared: Arc<Shared>, period_ms: u32, hw_write: Box<dyn Fn(&[i16]) + Send + Sync>) {
    let period_samples = (shared.period_frames * shared.channels) as usize;
    let mut mix_buf = vec![0i16; period_samples];
    let mut slot_buf = vec![0i16; period_samples];

    while shared.running.load(std::sync::atomic::Ordering::SeqCst) {
        let wake = shared.sem.take(period_ms);
        if wake == OsalStatus::Error {
            break;
        }
        if !shared.running.load(std::sync::atomic::Ordering::SeqCst) {
            break;
        }

        let mut slots = match shared.slots.lock() {
            Ok(g) => g,
            Err(_) => break,
        };

        mix_buf.iter_mut().for_each(|s| *s = 0);
        let mut any_active = false;

        for slot in slots.iter_mut() {
            if !slot.active {
                continue;
            }
            any_active = true;

            let avail = slot.count();
            if avail < period_samples as u64 {
                slot.underruns += 1;
                slot_buf.iter_mut().for_each(|s| *s = 0);
                if avail > 0 {
                    slot.read(&mut slot_buf[..avail as usize]);
                }
            } else {
                slot.read(&mut slot_buf);
            }

            for (mix, &sample) in mix_buf.iter_mut().zip(slot_buf.iter()) {
                let scaled = ((sample as i64) * (slot.volume as i64)) >> 16;
                let acc = (*mix as i64) + scaled;
                *mix = acc.clamp(-32768, 32767) as i16;
            }
        }

        drop(slots);

        if any_active {
            hw_write(&mix_buf);
        }
    }
}
