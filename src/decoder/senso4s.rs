//! Senso4s gas cylinder scale.
//!
//! 10 byte little-endian payload: u16 raw weight, u8 status, u8 battery %,
//! then the 6 byte device address.

use super::{DecodeError, SensorKind};
use bytes::Buf;

pub const SENSO4S_MANUFACTURER_ID: u16 = 0x09CC;

const PAYLOAD_LEN: usize = 10;

/// Raw reading of the empty scale for the supported device model.
pub const WEIGHT_OFFSET: u16 = 1940;

#[derive(Debug, Clone, PartialEq)]
pub struct Senso4sReading {
    /// Net weight in kg; negative when the scale reads below its offset
    pub weight_kg: f64,
    pub raw_weight: u16,
    /// Battery charge in percent
    pub battery: u8,
    pub status: u8,
}

pub fn decode(data: &[u8]) -> Result<Senso4sReading, DecodeError> {
    if data.len() != PAYLOAD_LEN {
        return Err(DecodeError::invalid_length(
            SensorKind::Senso4s,
            PAYLOAD_LEN,
            data,
        ));
    }

    let mut buf = data;
    let raw_weight = buf.get_u16_le();
    let status = buf.get_u8();
    let battery = buf.get_u8();

    Ok(Senso4sReading {
        weight_kg: (f64::from(raw_weight) - f64::from(WEIGHT_OFFSET)) / 100.0,
        raw_weight,
        battery,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(raw_weight: u16, status: u8, battery: u8) -> Vec<u8> {
        let mut data = raw_weight.to_le_bytes().to_vec();
        data.extend_from_slice(&[status, battery, 0xC4, 0x2F, 0x9F, 0x03, 0xB3, 0xEC]);
        data
    }

    #[test]
    fn test_decode_weight() {
        let reading = decode(&payload(2440, 1, 87)).unwrap();
        assert_eq!(reading.weight_kg, 5.0);
        assert_eq!(reading.raw_weight, 2440);
        assert_eq!(reading.status, 1);
        assert_eq!(reading.battery, 87);
    }

    #[test]
    fn test_below_offset_is_negative() {
        let reading = decode(&payload(1840, 0, 50)).unwrap();
        assert_eq!(reading.weight_kg, -1.0);
    }

    #[test]
    fn test_invalid_length() {
        let mut data = payload(2440, 0, 0);
        data.extend_from_slice(&[0; 6]);
        assert_eq!(
            decode(&data).unwrap_err(),
            DecodeError::InvalidPayloadLength {
                kind: SensorKind::Senso4s,
                expected: 10,
                actual: 16,
                payload: hex::encode(&data),
            }
        );
    }
}
