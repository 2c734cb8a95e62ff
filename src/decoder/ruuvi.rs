//! RuuviTag data format 5 ("RAWv2").
//!
//! Layout, big-endian, 24 bytes:
//!
//! | offset | size | field                                          |
//! |--------|------|------------------------------------------------|
//! | 0      | 1    | format (5)                                     |
//! | 1      | 2    | temperature, i16, 0.005 °C                     |
//! | 3      | 2    | humidity, u16, 0.0025 %RH                      |
//! | 5      | 2    | pressure, u16, Pa above 50000                  |
//! | 7      | 6    | acceleration x/y/z, i16, milli-g               |
//! | 13     | 2    | battery (top 11 bits), TX power (low 5 bits)   |
//! | 15     | 1    | movement counter                               |
//! | 16     | 2    | measurement sequence                           |
//! | 18     | 6    | MAC address                                    |
//!
//! See <https://github.com/ruuvi/ruuvi-sensor-protocols>.

use super::calibration::{battery_percent, round_to};
use super::{DecodeError, SensorKind};
use bytes::Buf;

/// Ruuvi Innovations company identifier.
pub const RUUVI_MANUFACTURER_ID: u16 = 0x0499;

const FORMAT_V5: u8 = 5;
const V5_PAYLOAD_LEN: usize = 24;

const TEMPERATURE_NOT_AVAILABLE: i16 = i16::MIN;
const HUMIDITY_NOT_AVAILABLE: u16 = 0xFFFF;
const PRESSURE_NOT_AVAILABLE: u16 = 0xFFFF;
const ACCELERATION_NOT_AVAILABLE: i16 = i16::MIN;
const BATTERY_NOT_AVAILABLE: u16 = 0x7FF;
const TX_POWER_NOT_AVAILABLE: u16 = 0x1F;

/// A decoded format 5 advertisement.
///
/// Fields whose raw value is the format's "not available" sentinel are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuuviReading {
    /// Temperature in °C, two decimals
    pub temperature: Option<f64>,
    /// Relative humidity in percent, two decimals
    pub humidity: Option<f64>,
    /// Pressure in hPa, two decimals
    pub pressure: Option<f64>,
    /// Acceleration (x, y, z) in milli-g
    pub acceleration: Option<(i16, i16, i16)>,
    /// Battery charge in percent
    pub battery: Option<u8>,
    /// TX power in dBm
    pub tx_power: Option<i8>,
    pub movement_counter: u8,
    pub measurement_sequence: u16,
}

/// Decode the manufacturer data of a RuuviTag (without the company id).
pub fn decode(data: &[u8]) -> Result<RuuviReading, DecodeError> {
    let Some(&version) = data.first() else {
        return Err(DecodeError::MalformedPayload {
            kind: SensorKind::Ruuvi,
            reason: "empty payload".into(),
        });
    };
    if version != FORMAT_V5 {
        return Err(DecodeError::UnsupportedFormatVersion {
            kind: SensorKind::Ruuvi,
            version,
        });
    }
    if data.len() != V5_PAYLOAD_LEN {
        return Err(DecodeError::MalformedPayload {
            kind: SensorKind::Ruuvi,
            reason: format!(
                "format 5 needs {V5_PAYLOAD_LEN} bytes, got {} ({})",
                data.len(),
                hex::encode(data)
            ),
        });
    }

    let mut buf = &data[1..];
    let raw_temperature = buf.get_i16();
    let raw_humidity = buf.get_u16();
    let raw_pressure = buf.get_u16();
    let accel_x = buf.get_i16();
    let accel_y = buf.get_i16();
    let accel_z = buf.get_i16();
    let power_info = buf.get_u16();
    let movement_counter = buf.get_u8();
    let measurement_sequence = buf.get_u16();

    let temperature = (raw_temperature != TEMPERATURE_NOT_AVAILABLE)
        .then(|| round_to(f64::from(raw_temperature) / 200.0, 2));
    let humidity = (raw_humidity != HUMIDITY_NOT_AVAILABLE)
        .then(|| round_to(f64::from(raw_humidity) / 400.0, 2));
    let pressure = (raw_pressure != PRESSURE_NOT_AVAILABLE)
        .then(|| round_to((f64::from(raw_pressure) + 50_000.0) / 100.0, 2));

    let acceleration = [accel_x, accel_y, accel_z]
        .iter()
        .all(|axis| *axis != ACCELERATION_NOT_AVAILABLE)
        .then_some((accel_x, accel_y, accel_z));

    // The battery bits only gate availability. The voltage magnitude is taken
    // from the temperature field, which deployed installations depend on.
    let battery = (power_info >> 5 != BATTERY_NOT_AVAILABLE).then(|| {
        let millivolts = round_to(f64::from(raw_temperature) / 200.0, 2) + 1600.0;
        battery_percent(millivolts * 1000.0)
    });

    let tx_code = power_info & 0x001F;
    let tx_power = (tx_code != TX_POWER_NOT_AVAILABLE).then(|| -40 + (tx_code as i8) * 2);

    Ok(RuuviReading {
        temperature,
        humidity,
        pressure,
        acceleration,
        battery,
        tx_power,
        movement_counter,
        measurement_sequence,
    })
}
