//! BlueZ D-Bus scanning backend.
//!
//! Registers a passive advertisement monitor matching the manufacturer codes
//! of every supported sensor. BlueZ reports each device only once per monitor
//! registration, so the monitor is dropped and registered again every scan
//! window to keep fresh readings coming.

use super::{ADVERTISEMENT_CHANNEL_BUFFER_SIZE, ScanError, ScanOptions};
use crate::advertisement::AdvertisementRecord;
use crate::decoder::dispatch::KNOWN_MANUFACTURER_IDS;
use bluer::monitor::{Monitor, MonitorEvent, MonitorManager, Pattern};
use bluer::{Adapter, Address, Session};
use futures::StreamExt;
use log::{debug, error, info};
use std::time::Duration;
use tokio::sync::mpsc;

/// Bluetooth manufacturer-specific data type (AD type 0xFF)
const MANUFACTURER_DATA_TYPE: u8 = 0xff;

impl From<bluer::Error> for ScanError {
    fn from(err: bluer::Error) -> Self {
        ScanError::Bluetooth(err.to_string())
    }
}

/// One pattern per manufacturer code; BlueZ ORs them together.
fn manufacturer_patterns() -> Vec<Pattern> {
    KNOWN_MANUFACTURER_IDS
        .iter()
        .map(|id| Pattern {
            data_type: MANUFACTURER_DATA_TYPE,
            start_position: 0,
            content: id.to_le_bytes().to_vec(),
        })
        .collect()
}

/// Start scanning with the BlueZ backend.
///
/// Fails if the session or adapter cannot be set up; errors inside the scan
/// loop are logged and the loop keeps cycling.
pub async fn start_scan(
    options: ScanOptions,
) -> Result<mpsc::Receiver<AdvertisementRecord>, ScanError> {
    let session = Session::new().await?;
    let adapter = match &options.adapter {
        Some(name) => session.adapter(name)?,
        None => session.default_adapter().await?,
    };
    adapter.set_powered(true).await?;
    let monitor_manager = adapter.monitor().await?;

    info!(
        "scanning on {} in {:?} cycles",
        adapter.name(),
        options.scan_window
    );

    let (tx, rx) = mpsc::channel(ADVERTISEMENT_CHANNEL_BUFFER_SIZE);

    tokio::spawn(async move {
        // Keep the D-Bus session alive for as long as the loop runs
        let _session = session;

        loop {
            if !scan_cycle(&adapter, &monitor_manager, options.scan_window, &tx).await {
                debug!("advertisement receiver dropped, stopping scan");
                return;
            }
        }
    });

    Ok(rx)
}

/// Run one scan window. Returns `false` once the receiver is gone.
async fn scan_cycle(
    adapter: &Adapter,
    monitor_manager: &MonitorManager,
    window: Duration,
    tx: &mpsc::Sender<AdvertisementRecord>,
) -> bool {
    let cycle = tokio::time::sleep(window);
    tokio::pin!(cycle);

    let mut handle = match monitor_manager
        .register(Monitor {
            patterns: Some(manufacturer_patterns()),
            ..Default::default()
        })
        .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("failed to register advertisement monitor: {e}");
            cycle.await;
            return !tx.is_closed();
        }
    };

    loop {
        tokio::select! {
            _ = &mut cycle => return true,
            event = handle.next() => match event {
                Some(MonitorEvent::DeviceFound(id)) => {
                    match read_record(adapter, id.device).await {
                        Ok(record) => {
                            if tx.send(record).await.is_err() {
                                return false;
                            }
                        }
                        Err(e) => debug!("{}: {e}", id.device),
                    }
                }
                Some(_) => {}
                None => {
                    (&mut cycle).await;
                    return true;
                }
            }
        }
    }
}

/// Snapshot the advertisement properties BlueZ holds for a device.
async fn read_record(
    adapter: &Adapter,
    address: Address,
) -> Result<AdvertisementRecord, ScanError> {
    let device = adapter.device(address)?;
    let manufacturer_data = device.manufacturer_data().await?.unwrap_or_default();
    let service_ids = device.uuids().await?.unwrap_or_default();
    let rssi = device.rssi().await?;

    Ok(AdvertisementRecord {
        address: address.into(),
        rssi,
        service_ids: service_ids.into_iter().collect(),
        manufacturer_data: manufacturer_data.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac_address::MacAddress;

    #[test]
    fn test_address_to_mac_address() {
        let addr = Address([0x03, 0xB3, 0xEC, 0xC4, 0x2F, 0x9F]);
        let mac: MacAddress = addr.into();
        assert_eq!(mac.to_string(), "03:B3:EC:C4:2F:9F");
    }

    #[test]
    fn test_patterns_are_little_endian_company_ids() {
        let contents: Vec<_> = manufacturer_patterns()
            .into_iter()
            .map(|p| p.content)
            .collect();
        assert_eq!(
            contents,
            [
                vec![0x99, 0x04],
                vec![0x00, 0x01],
                vec![0xAC, 0x00],
                vec![0x59, 0x00],
                vec![0xCC, 0x09],
            ]
        );
    }
}
