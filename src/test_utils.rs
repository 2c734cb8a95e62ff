use crate::mac_address::MacAddress;

/// A stable MAC address for unit tests.
pub const TEST_MAC: MacAddress = MacAddress([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

/// RuuviTag format 5 reference payload: 24.3 °C, 53.49 %, 1000.44 hPa.
pub fn ruuvi_payload() -> Vec<u8> {
    vec![
        0x05, 0x12, 0xFC, 0x53, 0x94, 0xC3, 0x7C, 0x00, 0x04, 0xFF, 0xFC, 0x04, 0x0C, 0xAC, 0x36,
        0x42, 0x00, 0xCD, 0xCB, 0xB8, 0x33, 0x4C, 0x88, 0x4F,
    ]
}

/// Mopeka payload at 0 °C, 3.0 V, three quality stars.
pub fn mopeka_payload(raw_level: u16) -> Vec<u8> {
    let [lo, hi] = raw_level.to_le_bytes();
    vec![3, 96, 0x28, lo, hi | 0xC0, 0x4F, 0xCD, 0x0C, 0x01, 0x02]
}

/// Senso4s payload with status 0 and 80 % battery.
pub fn senso4s_payload(raw_weight: u16) -> Vec<u8> {
    let mut data = raw_weight.to_le_bytes().to_vec();
    data.extend_from_slice(&[0, 80, 0xC4, 0x2F, 0x9F, 0x03, 0xB3, 0xEC]);
    data
}
