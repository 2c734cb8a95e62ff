//! BLE scanning.
//!
//! The scanner only collects advertisements; decoding happens in
//! [`crate::decoder`]. Records are delivered over a channel so the consumer
//! never blocks the Bluetooth event loop.

#[cfg(feature = "bluer")]
pub mod bluer;

use crate::advertisement::AdvertisementRecord;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Error type for scanner operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Bluetooth/adapter related error
    #[error("Bluetooth error: {0}")]
    Bluetooth(String),
    /// Scanning support not compiled in
    #[cfg(not(feature = "bluer"))]
    #[error("scanning not available: built without the 'bluer' feature")]
    NotAvailable,
}

/// Channel buffer size for advertisement records.
pub const ADVERTISEMENT_CHANNEL_BUFFER_SIZE: usize = 100;

/// How long each scan cycle runs before the monitor is restarted.
pub const DEFAULT_SCAN_WINDOW: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Adapter name such as `hci1`; the default adapter when `None`
    pub adapter: Option<String>,
    pub scan_window: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            adapter: None,
            scan_window: DEFAULT_SCAN_WINDOW,
        }
    }
}

/// Start scanning and return a receiver of advertisement records.
///
/// Runs until the receiver is dropped.
pub async fn start_scan(
    options: ScanOptions,
) -> Result<mpsc::Receiver<AdvertisementRecord>, ScanError> {
    #[cfg(feature = "bluer")]
    return bluer::start_scan(options).await;

    #[cfg(not(feature = "bluer"))]
    {
        let _ = options;
        Err(ScanError::NotAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::Bluetooth("adapter hci1 not found".to_string());
        assert_eq!(err.to_string(), "Bluetooth error: adapter hci1 not found");
    }

    #[test]
    fn test_default_options() {
        let options = ScanOptions::default();
        assert_eq!(options.adapter, None);
        assert_eq!(options.scan_window, Duration::from_secs(30));
    }

    #[cfg(not(feature = "bluer"))]
    #[tokio::test]
    async fn test_start_scan_without_backend() {
        let result = start_scan(ScanOptions::default()).await;
        assert!(matches!(result, Err(ScanError::NotAvailable)));
    }
}
