//! `signalk-blescanner` library.
//!
//! The pure decoding core lives in [`crate::decoder`]: it turns an
//! [`AdvertisementRecord`] into [`SensorReading`]s without any I/O. Around it
//! sit the BlueZ scanner, the stdin configuration stream and the SignalK
//! output formatter, wired together by [`crate::app`].

pub mod advertisement;
pub mod app;
pub mod config;
pub mod decoder;
pub mod mac_address;
pub mod output;
pub mod scanner;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types at the crate root
pub use advertisement::AdvertisementRecord;
pub use config::{DeviceRegistry, PluginConfig};
pub use decoder::dispatch::decode_advertisement;
pub use decoder::{DecodeError, SensorKind, SensorReading};
pub use mac_address::MacAddress;
pub use output::OutputFormatter;
pub use output::signalk::SignalKFormatter;
pub use scanner::{ScanError, ScanOptions};
