//! Decoders for the supported BLE sensor advertisement formats.
//!
//! Every decoder is a pure function from a manufacturer data buffer to a
//! typed reading. Nothing here touches the radio, the clock or any shared
//! state, so decoders can be called from any thread.

pub mod calibration;
pub mod dispatch;
pub mod mopeka;
pub mod ruuvi;
pub mod senso4s;
pub mod tpms;

use std::fmt;
use thiserror::Error;

pub use mopeka::MopekaReading;
pub use ruuvi::RuuviReading;
pub use senso4s::Senso4sReading;
pub use tpms::{TpmsReading, TpmsVariant};

/// The closed set of sensor families this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorKind {
    Ruuvi,
    Tpms,
    Mopeka,
    Senso4s,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Ruuvi,
        SensorKind::Tpms,
        SensorKind::Mopeka,
        SensorKind::Senso4s,
    ];

    /// Lowercase name, also used as the default SignalK path root.
    pub fn name(self) -> &'static str {
        match self {
            SensorKind::Ruuvi => "ruuvi",
            SensorKind::Tpms => "tpms",
            SensorKind::Mopeka => "mopeka",
            SensorKind::Senso4s => "senso4s",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded reading, one variant per sensor family.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorReading {
    Ruuvi(RuuviReading),
    Tpms(TpmsReading),
    Mopeka(MopekaReading),
    Senso4s(Senso4sReading),
}

impl SensorReading {
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorReading::Ruuvi(_) => SensorKind::Ruuvi,
            SensorReading::Tpms(_) => SensorKind::Tpms,
            SensorReading::Mopeka(_) => SensorKind::Mopeka,
            SensorReading::Senso4s(_) => SensorKind::Senso4s,
        }
    }
}

/// Why an advertisement could not be turned into a reading.
///
/// None of these are fatal: callers log them and move on to the next
/// advertisement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The payload carries a format or hardware discriminator we do not implement
    #[error("{kind}: unsupported format version {version}")]
    UnsupportedFormatVersion { kind: SensorKind, version: u8 },
    /// The payload length does not match the fixed layout
    #[error("{kind}: invalid payload length: expected {expected}, got {actual} ({payload})")]
    InvalidPayloadLength {
        kind: SensorKind,
        expected: usize,
        actual: usize,
        /// Hex dump of the offending buffer
        payload: String,
    },
    /// The service matched but none of the expected vendor codes were present
    #[error("{kind}: unknown manufacturer code, advertisement carries {present:04x?}")]
    UnknownManufacturerCode { kind: SensorKind, present: Vec<u16> },
    /// The payload is present but cannot be parsed
    #[error("{kind}: malformed payload: {reason}")]
    MalformedPayload { kind: SensorKind, reason: String },
}

impl DecodeError {
    pub(crate) fn invalid_length(kind: SensorKind, expected: usize, data: &[u8]) -> Self {
        DecodeError::InvalidPayloadLength {
            kind,
            expected,
            actual: data.len(),
            payload: hex::encode(data),
        }
    }

    /// The sensor family the failed decode was attempted for.
    pub fn kind(&self) -> SensorKind {
        match self {
            DecodeError::UnsupportedFormatVersion { kind, .. }
            | DecodeError::InvalidPayloadLength { kind, .. }
            | DecodeError::UnknownManufacturerCode { kind, .. }
            | DecodeError::MalformedPayload { kind, .. } => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let names: Vec<_> = SensorKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["ruuvi", "tpms", "mopeka", "senso4s"]);
    }

    #[test]
    fn test_invalid_length_carries_hex_dump() {
        let err = DecodeError::invalid_length(SensorKind::Senso4s, 10, &[0xde, 0xad]);
        assert_eq!(
            err.to_string(),
            "senso4s: invalid payload length: expected 10, got 2 (dead)"
        );
        assert_eq!(err.kind(), SensorKind::Senso4s);
    }

    #[test]
    fn test_unknown_manufacturer_display() {
        let err = DecodeError::UnknownManufacturerCode {
            kind: SensorKind::Tpms,
            present: vec![0x0499],
        };
        assert_eq!(
            err.to_string(),
            "tpms: unknown manufacturer code, advertisement carries [0499]"
        );
    }
}
