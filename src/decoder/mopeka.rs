//! Mopeka Pro propane tank level sensor.
//!
//! 10 byte payload:
//!
//! | byte | content                                               |
//! |------|-------------------------------------------------------|
//! | 0    | hardware id (3)                                       |
//! | 1    | battery voltage in 1/32 V (low 7 bits)                |
//! | 2    | temperature + 40 °C (low 7 bits), sync button (bit 7) |
//! | 3-4  | level, 14 bits LE; quality stars in the top 2 bits    |
//! | 5-7  | MAC address tail                                      |
//! | 8-9  | raw acceleration x, y                                 |

use super::calibration::{battery_percent, propane_level};
use super::{DecodeError, SensorKind};

/// Mopeka company identifier (Nordic Semiconductor).
pub const MOPEKA_MANUFACTURER_ID: u16 = 0x0059;

const PAYLOAD_LEN: usize = 10;
const HARDWARE_ID_PRO: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MopekaReading {
    /// Uncompensated level reading
    pub raw_level: u16,
    /// Propane level in millimetres, temperature compensated
    pub level_mm: u32,
    /// Temperature in °C
    pub temperature: f64,
    /// Reading quality, 0 (unusable) to 3 stars
    pub quality: u8,
    pub accel_x: u8,
    pub accel_y: u8,
    /// Battery charge in percent
    pub battery: u8,
    pub sync_pressed: bool,
}

pub fn decode(data: &[u8]) -> Result<MopekaReading, DecodeError> {
    if data.len() != PAYLOAD_LEN {
        return Err(DecodeError::invalid_length(
            SensorKind::Mopeka,
            PAYLOAD_LEN,
            data,
        ));
    }
    if data[0] != HARDWARE_ID_PRO {
        return Err(DecodeError::UnsupportedFormatVersion {
            kind: SensorKind::Mopeka,
            version: data[0],
        });
    }

    let voltage = f64::from(data[1] & 0x7F) / 32.0;
    let temperature = f64::from(data[2] & 0x7F) - 40.0;
    let sync_pressed = data[2] & 0x80 != 0;
    let level_word = u16::from_le_bytes([data[3], data[4]]);
    let raw_level = level_word & 0x3FFF;
    let quality = data[4] >> 6;

    Ok(MopekaReading {
        raw_level,
        level_mm: propane_level(raw_level, temperature),
        temperature,
        quality,
        accel_x: data[8],
        accel_y: data[9],
        battery: battery_percent(voltage),
        sync_pressed,
    })
}
