//! Layer lifecycle: a caller-owned compositing surface on a display.

use crate::sim;
use crate::types::{DisplayResult, LayerConfig};

pub struct Layer {
    slot: usize,
}

impl Layer {
    pub fn open(display_id: u8, config: LayerConfig) -> DisplayResult<Self> {
        let slot = sim::layer_open(display_id, config)?;
        Ok(Self { slot })
    }

    pub fn write(&mut self, pixels: &[u8]) -> DisplayResult<()> {
        sim::layer_write(self.slot, pixels)
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        sim::layer_close(self.slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device;
    use crate::types::PixelFormat;

    fn cfg() -> LayerConfig {
        LayerConfig {
            x: 0,
            y: 0,
            width: 16,
            height: 16,
            format: PixelFormat::Rgb565,
        }
    }

    #[test]
    fn layer_open_write_commit_round_trip() {
        sim::test_reset();
        device::init();
        let mut layer = Layer::open(0, cfg()).unwrap();
        let pixels = vec![0xABu8; 16 * 16 * 2];
        layer.write(&pixels).unwrap();
        device::commit(0).unwrap();
        assert_eq!(sim::test_get_framebuffer(), pixels);
    }

    #[test]
    fn layer_bounds_checked_against_device() {
        sim::test_reset();
        device::init();
        let oversized = LayerConfig {
            x: 310,
            y: 0,
            width: 16,
            height: 16,
            format: PixelFormat::Rgb565,
        };
        assert!(Layer::open(0, oversized).is_err());
    }

    #[test]
    fn closing_a_layer_frees_its_slot() {
        sim::test_reset();
        device::init();
        for _ in 0..sim::MAX_LAYERS {
            let layer = Layer::open(0, cfg()).unwrap();
            drop(layer);
        }
        assert!(Layer::open(0, cfg()).is_ok());
    }
}
