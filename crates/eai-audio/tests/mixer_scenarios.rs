//! End-to-end mixer scenarios through the public audio API rather than
//! the mixer module's internals.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use eai_audio::{
    audio_deinit, audio_init, find_port, AudioConfig, AudioFormat, ChannelMask, Direction,
    MixerConfig, PortType, Stream,
};

fn init_with_capture() -> Arc<Mutex<Vec<i16>>> {
    eai_audio::test_reset();
    audio_deinit();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let captured2 = captured.clone();
    audio_init(MixerConfig {
        sample_rate: 16_000,
        channels: 1,
        period_frames: 64,
        hw_write: Box::new(move |buf| *captured2.lock().unwrap() = buf.to_vec()),
    })
    .unwrap();
    captured
}

fn stream_config() -> AudioConfig {
    AudioConfig {
        sample_rate: 16_000,
        format: AudioFormat::PcmS16Le,
        channels: ChannelMask::Mono,
        frame_count: 64,
    }
}

#[test]
fn two_constant_streams_mix_to_exact_sum() {
    let captured = init_with_capture();
    let speaker = find_port(PortType::Speaker, Direction::Output).unwrap().id;

    let mut a = Stream::open(speaker, stream_config()).unwrap();
    let mut b = Stream::open(speaker, stream_config()).unwrap();
    a.start().unwrap();
    b.start().unwrap();

    a.write(&vec![1000i16; 64], 64).unwrap();
    b.write(&vec![2000i16; 64], 64).unwrap();

    std::thread::sleep(Duration::from_millis(50));

    let out = captured.lock().unwrap();
    assert_eq!(out.len(), 64);
    assert!(out.iter().all(|&s| s == 3000));
}

#[test]
fn overdriven_streams_hard_clip() {
    let captured = init_with_capture();
    let speaker = find_port(PortType::Speaker, Direction::Output).unwrap().id;

    let mut a = Stream::open(speaker, stream_config()).unwrap();
    let mut b = Stream::open(speaker, stream_config()).unwrap();
    a.start().unwrap();
    b.start().unwrap();

    a.write(&vec![20000i16; 64], 64).unwrap();
    b.write(&vec![20000i16; 64], 64).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert!(captured.lock().unwrap().iter().all(|&s| s == 32767));
}
