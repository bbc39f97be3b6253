//! Command policy: instrument-defined rules mapping a reading to a flight command.
//!
//! Flight levels are not hardcoded per mission. Each sensor colour defines its own
//! ceiling, and tilt beyond the stabilisation limit always forces a descent.

use serde::Serialize;

use crate::telemetry::{SensorStatus, TelemetryReading};

/// Tilt (degrees, on either gyroscope axis) above which the drone descends to stabilise.
pub const TILT_LIMIT: u32 = 45;

/// Altitude the drone must stay below while the sensor reports RED.
pub const RED_CEILING: i32 = 3;

/// Altitude the drone must stay below while the sensor reports YELLOW.
pub const YELLOW_CEILING: i32 = 1000;

/// Battery bands, lowest charge that still allows the associated speed.
pub const FULL_SPEED_BATTERY: u32 = 50;
pub const CRUISE_SPEED_BATTERY: u32 = 20;
pub const LOW_SPEED_BATTERY: u32 = 10;

pub const FULL_SPEED: u8 = 5;
pub const CRUISE_SPEED: u8 = 3;
pub const LOW_SPEED: u8 = 1;

/// Movement mode sent with every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    #[default]
    Fwd,
}

/// Outbound command, serialized as `{"speed":..,"altitude":..,"movement":"fwd"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Command {
    pub speed: u8,
    /// Altitude change: -1 descend, 0 hold, 1 climb.
    pub altitude: i8,
    pub movement: Movement,
}

impl Command {
    /// Apply both decisions to a reading.
    pub fn from_reading(reading: &TelemetryReading) -> Self {
        Self {
            speed: speed_for_battery(reading.battery),
            altitude: altitude_change(reading.y, reading.sensor, reading.gx, reading.gy),
            movement: Movement::Fwd,
        }
    }
}

/// Decide the altitude change for the current tick.
///
/// Tilt beyond [`TILT_LIMIT`] overrides the sensor rules. Otherwise RED and YELLOW
/// climb until their ceiling is reached (inclusive) and descend from there, GREEN holds.
pub fn altitude_change(altitude: i32, sensor: SensorStatus, gx: i32, gy: i32) -> i8 {
    let tilt = gx.unsigned_abs().max(gy.unsigned_abs());
    if tilt > TILT_LIMIT {
        return -1;
    }

    let ceiling = match sensor {
        SensorStatus::Red => RED_CEILING,
        SensorStatus::Yellow => YELLOW_CEILING,
        SensorStatus::Green => return 0,
    };

    if altitude >= ceiling { -1 } else { 1 }
}

/// Pick a speed from the remaining battery charge.
pub fn speed_for_battery(battery: u32) -> u8 {
    match battery {
        b if b >= FULL_SPEED_BATTERY => FULL_SPEED,
        b if b >= CRUISE_SPEED_BATTERY => CRUISE_SPEED,
        b if b >= LOW_SPEED_BATTERY => LOW_SPEED,
        _ => 0,
    }
}
