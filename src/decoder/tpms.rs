//! Tire pressure sensors.
//!
//! Two incompatible layouts are sold under the same service UUID. They are
//! told apart by the manufacturer code the sensor advertises under:
//!
//! * `0x0100` (hijacked TomTom id), 16 bytes:
//!   `80eaca108a78 e36d0000 e60a0000 5b 00`
//!   address, pressure, temperature, battery %, alarm flag.
//!   The low 7 bits of the first address byte are the wheel position
//!   (0x80 = 1, 0x81 = 2, ...).
//! * `0x00AC`, 15 bytes:
//!   `af494d00 1257471f 0a 9a33c4ecb303`
//!   pressure, temperature, battery %, address. No alarm flag.
//!
//! All integers are little-endian. When a sensor advertises both codes the
//! `0x00AC` layout wins.

use super::{DecodeError, SensorKind};
use bytes::Buf;
use std::collections::BTreeMap;

pub const TPMS_CLASSIC_MANUFACTURER_ID: u16 = 0x0100;
pub const TPMS_COMPACT_MANUFACTURER_ID: u16 = 0x00AC;

const CLASSIC_PAYLOAD_LEN: usize = 16;
const COMPACT_PAYLOAD_LEN: usize = 15;

/// Alarm value reported when the sensor does not carry an alarm flag.
pub const ALARM_OK: u8 = 0;

/// Which on-air layout a reading was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TpmsVariant {
    /// 16 byte layout under manufacturer code `0x0100`
    Classic,
    /// 15 byte layout under manufacturer code `0x00AC`
    Compact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TpmsReading {
    pub variant: TpmsVariant,
    /// Wheel position, only carried by the classic layout
    pub location: Option<u8>,
    pub pressure: f64,
    /// Temperature in °C
    pub temperature: f64,
    /// Battery charge in percent
    pub battery: u8,
    /// 0 = OK, 1 = no pressure
    pub alarm: u8,
}

/// Pick the variant from the manufacturer data map and decode it.
pub fn decode(manufacturer_data: &BTreeMap<u16, Vec<u8>>) -> Result<TpmsReading, DecodeError> {
    if let Some(data) = manufacturer_data.get(&TPMS_COMPACT_MANUFACTURER_ID) {
        return decode_compact(data);
    }
    if let Some(data) = manufacturer_data.get(&TPMS_CLASSIC_MANUFACTURER_ID) {
        return decode_classic(data);
    }
    Err(DecodeError::UnknownManufacturerCode {
        kind: SensorKind::Tpms,
        present: manufacturer_data.keys().copied().collect(),
    })
}

/// Decode the 16 byte layout advertised under `0x0100`.
pub fn decode_classic(data: &[u8]) -> Result<TpmsReading, DecodeError> {
    if data.len() != CLASSIC_PAYLOAD_LEN {
        return Err(DecodeError::invalid_length(
            SensorKind::Tpms,
            CLASSIC_PAYLOAD_LEN,
            data,
        ));
    }

    let location = data[0] & 0x7F;
    let mut buf = &data[6..];
    let pressure = buf.get_u32_le();
    let temperature = buf.get_u32_le();
    let battery = buf.get_u8();
    let alarm = buf.get_u8();

    Ok(TpmsReading {
        variant: TpmsVariant::Classic,
        location: Some(location),
        pressure: f64::from(pressure) / 100_000.0,
        temperature: f64::from(temperature) / 100.0,
        battery,
        alarm,
    })
}

/// Decode the 15 byte layout advertised under `0x00AC`.
pub fn decode_compact(data: &[u8]) -> Result<TpmsReading, DecodeError> {
    if data.len() != COMPACT_PAYLOAD_LEN {
        return Err(DecodeError::invalid_length(
            SensorKind::Tpms,
            COMPACT_PAYLOAD_LEN,
            data,
        ));
    }

    let mut buf = data;
    let pressure = buf.get_u32_le();
    let temperature = buf.get_u32_le();
    let battery = buf.get_u8();

    Ok(TpmsReading {
        variant: TpmsVariant::Compact,
        location: None,
        pressure: f64::from(pressure) / 1_000_000.0,
        temperature: f64::from(temperature) / 1_000_000.0,
        battery,
        alarm: ALARM_OK,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_payload() -> Vec<u8> {
        let mut data = vec![0x80, 0xEA, 0xCA, 0x10, 0x8A, 0x78];
        data.extend_from_slice(&2660u32.to_le_bytes());
        data.extend_from_slice(&2660u32.to_le_bytes());
        data.push(91);
        data.push(0);
        data
    }

    /// Captured from a sensor at 03:B3:EC:C4:33:9A.
    fn compact_payload() -> Vec<u8> {
        vec![
            0xaf, 0x49, 0x4d, 0x00, 0x12, 0x57, 0x47, 0x1f, 0x0a, 0x9a, 0x33, 0xc4, 0xec, 0xb3,
            0x03,
        ]
    }

    fn map(entries: &[(u16, Vec<u8>)]) -> BTreeMap<u16, Vec<u8>> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_decode_classic() {
        let reading = decode(&map(&[(256, classic_payload())])).unwrap();
        assert_eq!(reading.variant, TpmsVariant::Classic);
        assert!((reading.pressure - 0.0266).abs() < 1e-12);
        assert!((reading.temperature - 26.6).abs() < 1e-12);
        assert_eq!(reading.battery, 91);
        assert_eq!(reading.alarm, 0);
        assert_eq!(reading.location, Some(0));
    }

    #[test]
    fn test_classic_location_and_alarm() {
        let mut data = classic_payload();
        data[0] = 0x83;
        data[15] = 1;
        let reading = decode_classic(&data).unwrap();
        assert_eq!(reading.location, Some(3));
        assert_eq!(reading.alarm, 1);
    }

    #[test]
    fn test_decode_compact() {
        let reading = decode(&map(&[(172, compact_payload())])).unwrap();
        assert_eq!(reading.variant, TpmsVariant::Compact);
        // 0x004d49af and 0x1f475712
        assert!((reading.pressure - 5.065135).abs() < 1e-9);
        assert!((reading.temperature - 524.769042).abs() < 1e-9);
        assert_eq!(reading.battery, 10);
        assert_eq!(reading.alarm, ALARM_OK);
        assert_eq!(reading.location, None);
    }

    #[test]
    fn test_compact_wins_when_both_present() {
        let data = map(&[(256, classic_payload()), (172, compact_payload())]);
        let reading = decode(&data).unwrap();
        assert_eq!(reading.variant, TpmsVariant::Compact);
    }

    #[test]
    fn test_compact_tie_break_still_validates_length() {
        // The preferred variant is chosen before validation; a broken 0x00AC
        // payload is not rescued by a valid 0x0100 one.
        let data = map(&[(256, classic_payload()), (172, vec![0; 16])]);
        assert!(matches!(
            decode(&data),
            Err(DecodeError::InvalidPayloadLength {
                expected: 15,
                actual: 16,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_lengths() {
        let err = decode(&map(&[(256, compact_payload())])).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidPayloadLength {
                kind: SensorKind::Tpms,
                expected: 16,
                actual: 15,
                payload: "af494d001257471f0a9a33c4ecb303".into(),
            }
        );

        assert!(matches!(
            decode(&map(&[(172, vec![])])),
            Err(DecodeError::InvalidPayloadLength {
                expected: 15,
                actual: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_manufacturer() {
        assert_eq!(
            decode(&map(&[(0x0499, vec![5])])),
            Err(DecodeError::UnknownManufacturerCode {
                kind: SensorKind::Tpms,
                present: vec![0x0499],
            })
        );
        assert!(matches!(
            decode(&BTreeMap::new()),
            Err(DecodeError::UnknownManufacturerCode { .. })
        ));
    }
}
