//! Decode telemetry strings into `TelemetryReading` values.
//!
//! The server encodes each status report as a single delimited record:
//!
//! ```text
//! X-<x>-Y-<y>-BAT-<battery>-GYR-[<gx>,<gy>]-WIND-<wind>-DUST-<dust>-SENS-<sensor>
//! ```
//!
//! The gyroscope group may carry a third value (`[<gx>,<gy>,<gz>]`). Matching is
//! anchored at the start of the string and anything after the sensor token is ignored.

use std::str::FromStr;

use super::types::{DecodeError, SensorStatus, TelemetryReading};

/// Decode a telemetry string.
///
/// # Returns
///
/// `Ok(reading)` if the string starts with a complete record, `Err(DecodeError)` naming
/// the first token that did not match otherwise.
pub fn decode_telemetry(input: &str) -> Result<TelemetryReading, DecodeError> {
    let mut cursor = Cursor::new(input);

    cursor.expect("X-")?;
    let x = cursor.signed("x")?;
    cursor.expect("-Y-")?;
    let y = cursor.signed("y")?;
    cursor.expect("-BAT-")?;
    let battery = cursor.unsigned("battery")?;
    cursor.expect("-GYR-[")?;
    let gx = cursor.signed("gx")?;
    cursor.expect(",")?;
    let gy = cursor.signed("gy")?;
    let gz = if cursor.accept(",") { Some(cursor.signed("gz")?) } else { None };
    cursor.expect("]-WIND-")?;
    let wind = cursor.unsigned("wind")?;
    cursor.expect("-DUST-")?;
    let dust = cursor.unsigned("dust")?;
    cursor.expect("-SENS-")?;
    let sensor = cursor.sensor()?;

    Ok(TelemetryReading {
        x,
        y,
        battery,
        gx,
        gy,
        gz,
        wind,
        dust,
        sensor,
    })
}

impl FromStr for TelemetryReading {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_telemetry(s)
    }
}

/// Forward-only reader over the record.
struct Cursor<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    /// Consume `token` if the remaining input starts with it.
    fn accept(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.offset += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &'static str) -> Result<(), DecodeError> {
        if self.accept(token) {
            Ok(())
        } else {
            Err(DecodeError::MissingToken {
                expected: token,
                offset: self.offset,
            })
        }
    }

    /// Read `-?[0-9]+`.
    fn signed(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        let rest = self.rest();
        let sign_len = usize::from(rest.starts_with('-'));
        let len = sign_len + digit_count(&rest[sign_len..]);
        self.number(field, len, len > sign_len)
    }

    /// Read `[0-9]+`.
    fn unsigned(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let len = digit_count(self.rest());
        self.number(field, len, len > 0)
    }

    fn number<T: FromStr>(&mut self, field: &'static str, len: usize, has_digits: bool) -> Result<T, DecodeError> {
        let err = DecodeError::InvalidNumber {
            field,
            offset: self.offset,
        };
        if !has_digits {
            return Err(err);
        }

        // Overflow is the only way a digit run can fail to parse.
        let value = self.rest()[..len].parse().map_err(|_| err)?;
        self.offset += len;
        Ok(value)
    }

    fn sensor(&mut self) -> Result<SensorStatus, DecodeError> {
        [SensorStatus::Green, SensorStatus::Yellow, SensorStatus::Red]
            .into_iter()
            .find(|status| self.accept(status.token()))
            .ok_or(DecodeError::UnknownSensor { offset: self.offset })
    }
}

fn digit_count(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
