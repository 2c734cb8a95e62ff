//! Bluetooth device address type.
//!
//! Addresses show up in three shapes: raw bytes from the radio, colon
//! separated strings from humans, and bare hex strings from the SignalK
//! plugin configuration. All of them end up as a [`MacAddress`].

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A Bluetooth MAC address stored as a compact 6-byte array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Lowercase hex without separators, e.g. `03b3ecc42f9f`.
    ///
    /// Used as the path segment for devices that have no configured path.
    pub fn to_path_segment(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Errors returned when parsing a MAC address string.
#[derive(Error, Debug, PartialEq)]
pub enum ParseMacError {
    #[error("invalid MAC address: expected 12 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid MAC address: '{0}' is not valid hex")]
    InvalidHex(String),
}

impl FromStr for MacAddress {
    type Err = ParseMacError;

    /// Accepts `AA:BB:CC:DD:EE:FF`, `aabbccddeeff` and anything in between;
    /// colons are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.trim().chars().filter(|c| *c != ':').collect();
        if digits.len() != 12 {
            return Err(ParseMacError::InvalidLength(digits.len()));
        }

        let mut bytes = [0u8; 6];
        hex::decode_to_slice(&digits, &mut bytes)
            .map_err(|_| ParseMacError::InvalidHex(s.to_string()))?;

        Ok(MacAddress(bytes))
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

#[cfg(feature = "bluer")]
impl From<bluer::Address> for MacAddress {
    fn from(addr: bluer::Address) -> Self {
        Self(addr.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let addr = MacAddress([0x03, 0xB3, 0xEC, 0xC4, 0x2F, 0x9F]);
        assert_eq!(addr.to_string(), "03:B3:EC:C4:2F:9F");
    }

    #[test]
    fn test_path_segment() {
        let addr = MacAddress([0xE6, 0x91, 0xDF, 0x7B, 0xE5, 0x4D]);
        assert_eq!(addr.to_path_segment(), "e691df7be54d");
    }

    #[test]
    fn test_from_str_with_colons() {
        let addr: MacAddress = "80:EA:CA:12:24:30".parse().unwrap();
        assert_eq!(addr.0, [0x80, 0xEA, 0xCA, 0x12, 0x24, 0x30]);
    }

    #[test]
    fn test_from_str_bare_hex() {
        let addr: MacAddress = "d639ae4fcd0c".parse().unwrap();
        assert_eq!(addr.to_string(), "D6:39:AE:4F:CD:0C");
    }

    #[test]
    fn test_from_str_invalid() {
        assert_eq!(
            "invalid".parse::<MacAddress>(),
            Err(ParseMacError::InvalidLength(7))
        );
        assert_eq!(
            "AA:BB:CC".parse::<MacAddress>(),
            Err(ParseMacError::InvalidLength(6))
        );
        assert!(matches!(
            "AA:BB:CC:DD:EE:GG".parse::<MacAddress>(),
            Err(ParseMacError::InvalidHex(_))
        ));
    }
}
