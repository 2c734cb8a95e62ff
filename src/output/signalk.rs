//! SignalK delta output.
//!
//! Each reading becomes a single delta message:
//!
//! ```json
//! {"updates":[{"values":[{"path":"tanks.propane.0.propane_level","value":573}, ...]}]}
//! ```

use crate::advertisement::AdvertisementRecord;
use crate::config::DeviceRegistry;
use crate::decoder::calibration::round_to;
use crate::decoder::{SensorKind, SensorReading};
use crate::output::OutputFormatter;
use serde_json::{Value, json};

/// A single value in a delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Bool(bool),
}

impl FieldValue {
    fn rounded(self, places: u32) -> Self {
        match self {
            FieldValue::Float(v) => FieldValue::Float(round_to(v, places)),
            other => other,
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            // non-finite floats become null
            FieldValue::Float(v) => Value::from(v),
            FieldValue::Integer(v) => Value::from(v),
            FieldValue::Bool(v) => Value::from(v),
        }
    }
}

/// Key/value pairs for a reading, in output order. Absent values are skipped.
pub fn fields(reading: &SensorReading) -> Vec<(&'static str, FieldValue)> {
    use FieldValue::{Bool, Float, Integer};

    let mut fields = Vec::new();
    macro_rules! add {
        ($name:literal, $val:expr) => {
            if let Some(v) = $val {
                fields.push(($name, v));
            }
        };
    }

    match reading {
        SensorReading::Ruuvi(r) => {
            add!("temperature", r.temperature.map(Float));
            add!("humidity", r.humidity.map(Float));
            add!("pressure", r.pressure.map(Float));
            if let Some((x, y, z)) = r.acceleration {
                fields.push(("accel_x", Integer(x.into())));
                fields.push(("accel_y", Integer(y.into())));
                fields.push(("accel_z", Integer(z.into())));
            }
            add!("battery", r.battery.map(|b| Integer(b.into())));
            fields.push(("movements", Integer(r.movement_counter.into())));
            fields.push(("sequence", Integer(r.measurement_sequence.into())));
        }
        SensorReading::Tpms(r) => {
            fields.push(("pressure", Float(r.pressure)));
            fields.push(("temperature", Float(r.temperature)));
            fields.push(("battery", Integer(r.battery.into())));
            fields.push(("status", Integer(r.alarm.into())));
        }
        SensorReading::Mopeka(r) => {
            fields.push(("raw_level", Integer(r.raw_level.into())));
            fields.push(("propane_level", Integer(r.level_mm.into())));
            fields.push(("temperature", Float(r.temperature)));
            fields.push(("quality", Integer(r.quality.into())));
            fields.push(("accel_x", Integer(r.accel_x.into())));
            fields.push(("accel_y", Integer(r.accel_y.into())));
            fields.push(("battery", Integer(r.battery.into())));
            fields.push(("sync", Bool(r.sync_pressed)));
        }
        SensorReading::Senso4s(r) => {
            fields.push(("weight", Float(r.weight_kg)));
            fields.push(("rawweight", Integer(r.raw_weight.into())));
            fields.push(("battery", Integer(r.battery.into())));
            fields.push(("status", Integer(r.status.into())));
        }
    }

    fields
}

/// SignalK delta formatter.
///
/// Paths are `<device path>.<key>` for configured devices and
/// `<sensor kind>.<mac without colons>.<key>` otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalKFormatter;

impl SignalKFormatter {
    pub fn new() -> Self {
        Self
    }

    fn prefix(
        &self,
        record: &AdvertisementRecord,
        kind: SensorKind,
        registry: &DeviceRegistry,
    ) -> String {
        registry
            .device(&record.address)
            .and_then(|device| device.path.clone())
            .unwrap_or_else(|| format!("{kind}.{}", record.address.to_path_segment()))
    }

    /// Build the delta as a JSON value.
    pub fn delta(
        &self,
        record: &AdvertisementRecord,
        reading: &SensorReading,
        registry: &DeviceRegistry,
    ) -> Value {
        let prefix = self.prefix(record, reading.kind(), registry);

        let mut values: Vec<Value> = fields(reading)
            .into_iter()
            .map(|(key, value)| {
                json!({
                    "path": format!("{prefix}.{key}"),
                    "value": Value::from(value.rounded(registry.rounding)),
                })
            })
            .collect();

        if let Some(rssi) = record.rssi {
            values.push(json!({ "path": format!("{prefix}.rssi"), "value": rssi }));
        }

        json!({ "updates": [{ "values": values }] })
    }
}

impl OutputFormatter for SignalKFormatter {
    fn format(
        &self,
        record: &AdvertisementRecord,
        reading: &SensorReading,
        registry: &DeviceRegistry,
    ) -> String {
        self.delta(record, reading, registry).to_string()
    }
}
