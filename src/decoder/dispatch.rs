//! Service UUID based selection of decoders.

use super::{DecodeError, SensorKind, SensorReading, mopeka, ruuvi, senso4s, tpms};
use crate::advertisement::AdvertisementRecord;
use uuid::Uuid;

/// Nordic UART service, advertised by RuuviTags.
pub const RUUVI_SERVICE: Uuid = Uuid::from_u128(0x6e400001_b5a3_f393_e0a9_e50e24dcca9e);
pub const TPMS_SERVICE: Uuid = Uuid::from_u128(0x0000fbb0_0000_1000_8000_00805f9b34fb);
pub const MOPEKA_SERVICE: Uuid = Uuid::from_u128(0x0000fee5_0000_1000_8000_00805f9b34fb);
pub const SENSO4S_SERVICE: Uuid = Uuid::from_u128(0x00007081_0000_1000_8000_00805f9b34fb);

/// Service UUID to sensor family. Never modified at runtime.
static SERVICE_TABLE: [(Uuid, SensorKind); 4] = [
    (RUUVI_SERVICE, SensorKind::Ruuvi),
    (TPMS_SERVICE, SensorKind::Tpms),
    (MOPEKA_SERVICE, SensorKind::Mopeka),
    (SENSO4S_SERVICE, SensorKind::Senso4s),
];

/// Sensor family advertising `service`, if it is one we decode.
pub fn lookup(service: &Uuid) -> Option<SensorKind> {
    SERVICE_TABLE
        .iter()
        .find(|(uuid, _)| uuid == service)
        .map(|(_, kind)| *kind)
}

/// The service UUID that selects `kind`.
pub fn service_id(kind: SensorKind) -> Uuid {
    match kind {
        SensorKind::Ruuvi => RUUVI_SERVICE,
        SensorKind::Tpms => TPMS_SERVICE,
        SensorKind::Mopeka => MOPEKA_SERVICE,
        SensorKind::Senso4s => SENSO4S_SERVICE,
    }
}

/// Every manufacturer code a supported sensor may advertise under.
pub const KNOWN_MANUFACTURER_IDS: [u16; 5] = [
    ruuvi::RUUVI_MANUFACTURER_ID,
    tpms::TPMS_CLASSIC_MANUFACTURER_ID,
    tpms::TPMS_COMPACT_MANUFACTURER_ID,
    mopeka::MOPEKA_MANUFACTURER_ID,
    senso4s::SENSO4S_MANUFACTURER_ID,
];

fn vendor_payload<'a>(
    record: &'a AdvertisementRecord,
    kind: SensorKind,
    vendor: u16,
) -> Result<&'a [u8], DecodeError> {
    record
        .manufacturer_data
        .get(&vendor)
        .map(Vec::as_slice)
        .ok_or_else(|| DecodeError::UnknownManufacturerCode {
            kind,
            present: record.vendor_codes(),
        })
}

/// Run the decoder for `kind` against the record's manufacturer data.
pub fn decode_as(
    kind: SensorKind,
    record: &AdvertisementRecord,
) -> Result<SensorReading, DecodeError> {
    match kind {
        SensorKind::Ruuvi => {
            let data = vendor_payload(record, kind, ruuvi::RUUVI_MANUFACTURER_ID)?;
            ruuvi::decode(data).map(SensorReading::Ruuvi)
        }
        SensorKind::Tpms => tpms::decode(&record.manufacturer_data).map(SensorReading::Tpms),
        SensorKind::Mopeka => {
            let data = vendor_payload(record, kind, mopeka::MOPEKA_MANUFACTURER_ID)?;
            mopeka::decode(data).map(SensorReading::Mopeka)
        }
        SensorKind::Senso4s => {
            let data = vendor_payload(record, kind, senso4s::SENSO4S_MANUFACTURER_ID)?;
            senso4s::decode(data).map(SensorReading::Senso4s)
        }
    }
}

/// Decode every supported format the record advertises.
///
/// Returns one result per matching service UUID, in UUID order. Unknown
/// services are skipped; a failing decoder does not affect the others.
pub fn decode_advertisement(
    record: &AdvertisementRecord,
) -> Vec<Result<SensorReading, DecodeError>> {
    record
        .service_ids
        .iter()
        .filter_map(lookup)
        .map(|kind| decode_as(kind, record))
        .collect()
}
