//! Simulation backend: one fake 320x240 RGB565 display, grounded on
//! `lib/eai_display/src/posix/display.c`.

use std::sync::{Arc, Mutex, OnceLock};

use crate::types::{Device, DisplayError, DisplayResult, LayerConfig, PixelFormat};

pub const MAX_LAYERS: usize = 4;
const FAKE_WIDTH: u16 = 320;
const FAKE_HEIGHT: u16 = 240;

type VsyncCb = Arc<dyn Fn(u8, u64) + Send + Sync>;

struct LayerSlot {
    display_id: u8,
    config: LayerConfig,
    buf: Vec<u8>,
}

struct State {
    initialized: bool,
    devices: Vec<Device>,
    layers: Vec<Option<LayerSlot>>,
    framebuffer: Vec<u8>,
    commit_count: u32,
    brightness: u8,
    vsync_enabled: bool,
    vsync_cb: Option<VsyncCb>,
}

fn default_devices() -> Vec<Device> {
    vec![Device {
        id: 0,
        name: "lcd".into(),
        width: FAKE_WIDTH,
        height: FAKE_HEIGHT,
        formats: vec![PixelFormat::Rgb565, PixelFormat::Rgb888],
        max_fps: 60,
        max_layers: MAX_LAYERS as u8,
    }]
}

fn fresh_state(initialized: bool) -> State {
    State {
        initialized,
        devices: default_devices(),
        layers: (0..MAX_LAYERS).map(|_| None).collect(),
        framebuffer: Vec::new(),
        commit_count: 0,
        brightness: 100,
        vsync_enabled: false,
        vsync_cb: None,
    }
}

fn state() -> &'static Mutex<State> {
    static STATE: OnceLock<Mutex<State>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(fresh_state(false)))
}

pub fn init() {
    *state().lock().unwrap_or_else(|e| e.into_inner()) = fresh_state(true);
}

pub fn deinit() -> DisplayResult<()> {
    let mut guard = state().lock().map_err(|_| DisplayError::InvalidParameter)?;
    if !guard.initialized {
        return Err(DisplayError::InvalidParameter);
    }
    guard.layers.iter_mut().for_each(|l| *l = None);
    guard.initialized = false;
    Ok(())
}

fn require_init(guard: &State) -> DisplayResult<()> {
    if guard.initialized {
        Ok(())
    } else {
        Err(DisplayError::InvalidParameter)
    }
}

pub fn device_count() -> DisplayResult<usize> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    Ok(guard.devices.len())
}

pub fn get_device(index: u8) -> DisplayResult<Device> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    guard
        .devices
        .get(index as usize)
        .cloned()
        .ok_or(DisplayError::InvalidParameter)
}

/// Open a layer, returning its slot index within the module table.
pub fn layer_open(display_id: u8, config: LayerConfig) -> DisplayResult<usize> {
    let mut guard = state().lock().unwrap();
    require_init(&guard)?;

    let device = guard
        .devices
        .get(display_id as usize)
        .cloned()
        .ok_or(DisplayError::NotFound)?;

    if config.x + config.width > device.width || config.y + config.height > device.height {
        return Err(DisplayError::InvalidParameter);
    }

    let slot = guard
        .layers
        .iter()
        .position(|l| l.is_none())
        .ok_or(DisplayError::NoMemory)?;

    guard.layers[slot] = Some(LayerSlot {
        display_id,
        config,
        buf: Vec::new(),
    });
    Ok(slot)
}

pub fn layer_write(slot: usize, pixels: &[u8]) -> DisplayResult<()> {
    if pixels.is_empty() {
        return Err(DisplayError::InvalidParameter);
    }
    let mut guard = state().lock().unwrap();
    require_init(&guard)?;
    let layer = guard
        .layers
        .get_mut(slot)
        .and_then(|l| l.as_mut())
        .ok_or(DisplayError::InvalidParameter)?;

    let expected = expected_bytes(layer.config);
    let to_write = pixels.len().min(expected as usize);
    layer.buf = pixels[..to_write].to_vec();
    Ok(())
}

fn expected_bytes(config: LayerConfig) -> u32 {
    if config.format == PixelFormat::Mono1 {
        (config.width as u32 * config.height as u32 + 7) / 8
    } else {
        config.width as u32 * config.height as u32 * config.format.bytes_per_pixel()
    }
}

pub fn layer_close(slot: usize) {
    if let Ok(mut guard) = state().lock() {
        if let Some(entry) = guard.layers.get_mut(slot) {
            *entry = None;
        }
    }
}

/// Compose the first active layer on `display_id` into the framebuffer
/// and fire the vsync callback, matching the original's "first layer
/// wins" compositor.
pub fn commit(display_id: u8) -> DisplayResult<()> {
    let (cb, enabled) = {
        let mut guard = state().lock().unwrap();
        require_init(&guard)?;
        if display_id as usize >= guard.devices.len() {
            return Err(DisplayError::InvalidParameter);
        }

        guard.framebuffer.clear();
        if let Some(layer) = guard
            .layers
            .iter()
            .flatten()
            .find(|l| l.display_id == display_id && !l.buf.is_empty())
        {
            guard.framebuffer = layer.buf.clone();
        }
        guard.commit_count += 1;

        (guard.vsync_cb.clone(), guard.vsync_enabled)
    };

    if enabled {
        if let Some(cb) = cb {
            cb(display_id, 0);
        }
    }
    Ok(())
}

pub fn set_brightness(display_id: u8, percent: u8) -> DisplayResult<()> {
    let mut guard = state().lock().unwrap();
    require_init(&guard)?;
    if display_id as usize >= guard.devices.len() {
        return Err(DisplayError::InvalidParameter);
    }
    guard.brightness = percent.min(100);
    Ok(())
}

pub fn get_brightness(display_id: u8) -> DisplayResult<u8> {
    let guard = state().lock().unwrap();
    require_init(&guard)?;
    if display_id as usize >= guard.devices.len() {
        return Err(DisplayError::InvalidParameter);
    }
    Ok(guard.brightness)
}

pub fn set_vsync<F>(display_id: u8, enabled: bool, cb: Option<F>) -> DisplayResult<()>
where
    F: Fn(u8, u64) + Send + Sync + 'static,
{
    let mut guard = state().lock().unwrap();
    require_init(&guard)?;
    if display_id as usize >= guard.devices.len() {
        return Err(DisplayError::InvalidParameter);
    }
    guard.vsync_enabled = enabled;
    guard.vsync_cb = cb.map(|f| Arc::new(f) as VsyncCb);
    Ok(())
}

pub fn test_get_framebuffer() -> Vec<u8> {
    state().lock().unwrap().framebuffer.clone()
}

pub fn test_get_commit_count() -> u32 {
    state().lock().unwrap().commit_count
}

/// Fire the registered vsync callback directly with `timestamp_ns`,
/// bypassing `commit`'s `vsync_enabled` gate. Test-only, matching
/// `eai-input`'s `test_inject_event`.
pub fn test_fire_vsync(display_id: u8, timestamp_ns: u64) {
    let cb = state()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .vsync_cb
        .clone();
    if let Some(cb) = cb {
        cb(display_id, timestamp_ns);
    }
}

pub fn test_reset() {
    *state().lock().unwrap_or_else(|e| e.into_inner()) = fresh_state(false);
}
