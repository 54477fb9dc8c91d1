//! Shared sensor types.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorType {
    Accel,
    Gyro,
    Mag,
    Pressure,
    Temperature,
    Humidity,
    Light,
    Proximity,
}

/// Either a 3-axis reading (accel/gyro/mag, in milli-units) or a scalar
/// one (pressure/temperature/humidity/light/proximity).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reading {
    Vec3 { x: i32, y: i32, z: i32 },
    Scalar(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorData {
    pub device_id: u8,
    pub sensor_type: SensorType,
    pub timestamp_ns: u64,
    pub reading: Reading,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub id: u8,
    pub name: String,
    pub sensor_type: SensorType,
    pub range_min: i32,
    pub range_max: i32,
    pub resolution: i32,
    pub max_rate_hz: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub rate_hz: u32,
    pub max_latency_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorError {
    InvalidParameter,
    NotFound,
    Busy,
}

pub type SensorResult<T> = Result<T, SensorError>;
