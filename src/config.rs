//! Runtime configuration.
//!
//! The SignalK server pushes the plugin configuration to the scanner as JSON
//! lines on stdin, e.g.
//!
//! ```json
//! {"whitelist": true, "rounding": 4,
//!  "multipleParametersArray": [{"macaddress": "03B3ECC42F9F", "path": "tanks.propane.0"}]}
//! ```
//!
//! Each line is merged into a [`DeviceRegistry`] which is published to the
//! scan loop through a [`tokio::sync::watch`] channel.

use crate::mac_address::{MacAddress, ParseMacError};
use log::{error, info};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;

/// Decimal places used until the plugin says otherwise.
pub const DEFAULT_ROUNDING: u32 = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid device address '{address}': {source}")]
    Mac {
        address: String,
        #[source]
        source: ParseMacError,
    },
}

/// One configuration message as sent by the SignalK plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Only report devices listed in `multiple_parameters_array`
    pub whitelist: bool,
    pub rounding: u32,
    #[serde(default)]
    pub multiple_parameters_array: Vec<DeviceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceEntry {
    pub macaddress: String,
    /// SignalK path prefix for this device's values
    #[serde(default)]
    pub path: Option<String>,
    /// Any other keys the plugin attaches, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceConfig {
    pub path: Option<String>,
    pub extra: Map<String, Value>,
}

/// Known devices plus the global reporting switches.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRegistry {
    pub whitelist: bool,
    pub rounding: u32,
    devices: HashMap<MacAddress, DeviceConfig>,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new(true, DEFAULT_ROUNDING)
    }
}

impl DeviceRegistry {
    pub fn new(whitelist: bool, rounding: u32) -> Self {
        Self {
            whitelist,
            rounding,
            devices: HashMap::new(),
        }
    }

    /// Merge a configuration message.
    ///
    /// Devices are added or replaced, never removed. The message is rejected
    /// as a whole if any address fails to parse.
    pub fn apply(&mut self, config: PluginConfig) -> Result<(), ConfigError> {
        let entries = config
            .multiple_parameters_array
            .into_iter()
            .map(|entry| {
                let mac = entry
                    .macaddress
                    .parse::<MacAddress>()
                    .map_err(|source| ConfigError::Mac {
                        address: entry.macaddress.clone(),
                        source,
                    })?;
                Ok((
                    mac,
                    DeviceConfig {
                        path: entry.path,
                        extra: entry.extra,
                    },
                ))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        self.devices.extend(entries);
        self.whitelist = config.whitelist;
        self.rounding = config.rounding;
        Ok(())
    }

    pub fn device(&self, mac: &MacAddress) -> Option<&DeviceConfig> {
        self.devices.get(mac)
    }

    /// Whether readings from `mac` should be reported.
    pub fn accepts(&self, mac: &MacAddress) -> bool {
        !self.whitelist || self.devices.contains_key(mac)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Parse one line of the configuration stream. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<PluginConfig>, ConfigError> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Read configuration lines until EOF, publishing every accepted update.
///
/// Bad lines are logged and skipped. Returns when the reader is exhausted or
/// fails.
pub async fn watch_config<R>(
    reader: R,
    registry: watch::Sender<Arc<DeviceRegistry>>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let config = match parse_line(&line) {
            Ok(Some(config)) => config,
            Ok(None) => continue,
            Err(e) => {
                error!("{e}: {line}");
                continue;
            }
        };

        let mut next = DeviceRegistry::clone(&registry.borrow());
        match next.apply(config) {
            Ok(()) => {
                info!(
                    "configuration: {} known devices, whitelist={}, rounding={}",
                    next.len(),
                    next.whitelist,
                    next.rounding
                );
                registry.send_replace(Arc::new(next));
            }
            Err(e) => error!("{e}"),
        }
    }
    Ok(())
}

/// Parse a duration such as `30s`, `500ms`, `2m` or `1h`. A bare number is
/// seconds. Zero is rejected.
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    let src = src.trim();
    let units: [(&str, u64); 4] = [("ms", 1), ("s", 1_000), ("m", 60_000), ("h", 3_600_000)];
    let (number, unit_ms) = units
        .iter()
        .find_map(|&(suffix, ms)| src.strip_suffix(suffix).map(|n| (n, ms)))
        .unwrap_or((src, 1_000));

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: '{src}'"))?;
    match value.checked_mul(unit_ms) {
        Some(0) => Err("duration must be greater than zero".to_string()),
        Some(ms) => Ok(Duration::from_millis(ms)),
        None => Err(format!("duration too large: '{src}'")),
    }
}
