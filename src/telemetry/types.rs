//! Type definitions for decoded telemetry.

use std::fmt;

/// Status reported by the drone's environment sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    Green,
    Yellow,
    Red,
}

impl SensorStatus {
    /// Wire token for this status, as it appears after `SENS-`.
    pub fn token(self) -> &'static str {
        match self {
            SensorStatus::Green => "GREEN",
            SensorStatus::Yellow => "YELLOW",
            SensorStatus::Red => "RED",
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One decoded telemetry string.
///
/// Only produced by a successful decode; there is no zero-valued fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryReading {
    pub x: i32,
    /// Altitude.
    pub y: i32,
    /// Battery charge, expected 0..=100.
    pub battery: u32,
    pub gx: i32,
    pub gy: i32,
    /// Third gyroscope axis, only present when the server sends one. Unused by the policy.
    pub gz: Option<i32>,
    pub wind: u32,
    pub dust: u32,
    pub sensor: SensorStatus,
}

/// Renders the reading back into the wire grammar.
impl fmt::Display for TelemetryReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X-{}-Y-{}-BAT-{}-GYR-[{},{}", self.x, self.y, self.battery, self.gx, self.gy)?;
        if let Some(gz) = self.gz {
            write!(f, ",{}", gz)?;
        }
        write!(f, "]-WIND-{}-DUST-{}-SENS-{}", self.wind, self.dust, self.sensor)
    }
}

/// Reasons a telemetry string fails to decode.
///
/// `offset` is the byte position in the input where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    MissingToken { expected: &'static str, offset: usize },
    InvalidNumber { field: &'static str, offset: usize },
    UnknownSensor { offset: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingToken { expected, offset } => {
                write!(f, "expected '{}' at offset {}", expected, offset)
            }
            DecodeError::InvalidNumber { field, offset } => {
                write!(f, "invalid number for '{}' at offset {}", field, offset)
            }
            DecodeError::UnknownSensor { offset } => write!(f, "unknown sensor status at offset {}", offset),
        }
    }
}

impl std::error::Error for DecodeError {}
