//! Telemetry module: the wire grammar the simulator uses to report drone state.

pub mod decoder;
pub mod types;

pub use decoder::decode_telemetry;
pub use types::{DecodeError, SensorStatus, TelemetryReading};
