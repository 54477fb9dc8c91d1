//! Session lifecycle: exclusive per-device data delivery, polled or
//! pushed through a callback.

use std::sync::Arc;

use crate::sim;
use crate::types::{SensorData, SensorError, SensorResult, SessionConfig};

type DataCb = Arc<dyn Fn(&SensorData) + Send + Sync>;

pub struct Session {
    device_id: u8,
    #[allow(dead_code)]
    config: SessionConfig,
    active: bool,
    callback: Option<DataCb>,
}

impl Session {
    /// Open a session on `device_id`. Fails `Busy` if the device already
    /// has an open session — sensor sessions, unlike mixer-backed audio
    /// streams, do not support multiplexing.
    pub fn open(device_id: u8, config: SessionConfig) -> SensorResult<Self> {
        sim::claim_device(device_id)?;
        Ok(Self {
            device_id,
            config,
            active: false,
            callback: None,
        })
    }

    /// Start delivery. With `callback` set, injected data is pushed
    /// synchronously; otherwise callers must [`Session::read`].
    pub fn start<F>(&mut self, callback: Option<F>)
    where
        F: Fn(&SensorData) + Send + Sync + 'static,
    {
        self.callback = callback.map(|f| Arc::new(f) as DataCb);
        self.active = true;
    }

    /// Poll up to `count` readings for this session's device.
    pub fn read(&self, count: usize) -> SensorResult<Vec<SensorData>> {
        if !self.active || count == 0 {
            return Err(SensorError::InvalidParameter);
        }
        Ok(sim::drain_for_device(self.device_id, count))
    }

    /// Deliver all pending readings through the callback, if one is
    /// registered; otherwise a no-op.
    pub fn flush(&self) -> SensorResult<()> {
        if !self.active {
            return Err(SensorError::InvalidParameter);
        }
        if let Some(cb) = &self.callback {
            for data in sim::drain_for_device(self.device_id, usize::MAX) {
                cb(&data);
            }
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.callback = None;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        sim::release_device(self.device_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device;
    use crate::types::{Reading, SensorData, SensorType};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cfg() -> SessionConfig {
        SessionConfig {
            rate_hz: 100,
            max_latency_ms: 0,
        }
    }

    fn sample(device_id: u8) -> SensorData {
        SensorData {
            device_id,
            sensor_type: SensorType::Accel,
            timestamp_ns: 0,
            reading: Reading::Vec3 { x: 1, y: 2, z: 3 },
        }
    }

    #[test]
    fn session_open_is_exclusive_per_device() {
        sim::test_reset();
        device::init();
        let _s = Session::open(0, cfg()).unwrap();
        assert_eq!(Session::open(0, cfg()).err(), Some(SensorError::Busy));
    }

    #[test]
    fn reopen_allowed_after_close() {
        sim::test_reset();
        device::init();
        let s = Session::open(0, cfg()).unwrap();
        drop(s);
        assert!(Session::open(0, cfg()).is_ok());
    }

    #[test]
    fn polling_reads_injected_data_for_this_device_only() {
        sim::test_reset();
        device::init();
        let mut s = Session::open(0, cfg()).unwrap();
        s.start::<fn(&SensorData)>(None);
        sim::test_inject_data(sample(0));
        sim::test_inject_data(sample(1));
        sim::test_inject_data(sample(0));
        let readings = s.read(10).unwrap();
        assert_eq!(readings.len(), 2);
    }

    #[test]
    fn flush_delivers_via_callback() {
        sim::test_reset();
        device::init();
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        let mut s = Session::open(0, cfg()).unwrap();
        s.start(Some(move |_: &SensorData| {
            count2.fetch_add(1, Ordering::SeqCst);
        }));
        sim::test_inject_data(sample(0));
        sim::test_inject_data(sample(0));
        s.flush().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
