//! A single BLE advertisement as delivered by the scanner.

use crate::mac_address::MacAddress;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Everything the decoders need from one advertising event.
///
/// Ordered collections keep dispatch order and diagnostics deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdvertisementRecord {
    pub address: MacAddress,
    /// Signal strength in dBm, if the adapter reported one
    pub rssi: Option<i16>,
    pub service_ids: BTreeSet<Uuid>,
    /// Manufacturer specific data keyed by Bluetooth SIG company identifier
    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
}

impl AdvertisementRecord {
    pub fn new(address: MacAddress) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }

    pub fn with_service(mut self, service: Uuid) -> Self {
        self.service_ids.insert(service);
        self
    }

    pub fn with_manufacturer_data(mut self, vendor: u16, data: impl Into<Vec<u8>>) -> Self {
        self.manufacturer_data.insert(vendor, data.into());
        self
    }

    /// Vendor codes present in this record, for diagnostics.
    pub fn vendor_codes(&self) -> Vec<u16> {
        self.manufacturer_data.keys().copied().collect()
    }
}
