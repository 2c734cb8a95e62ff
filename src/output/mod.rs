//! Output formatters for decoded sensor readings.
//!
//! Formatters turn a reading into one line of text for the downstream
//! consumer. SignalK delta messages are the only format today.

pub mod signalk;

use crate::advertisement::AdvertisementRecord;
use crate::config::DeviceRegistry;
use crate::decoder::SensorReading;

/// Trait for formatting readings into output lines.
pub trait OutputFormatter: Send + Sync {
    /// Format a reading decoded from `record`.
    ///
    /// The registry supplies the per-device path and the rounding precision.
    fn format(
        &self,
        record: &AdvertisementRecord,
        reading: &SensorReading,
        registry: &DeviceRegistry,
    ) -> String;
}
