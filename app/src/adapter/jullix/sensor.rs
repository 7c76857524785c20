use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use super::flatten::flatten_sample;
use super::{Category, Snapshot};
use crate::core::time::DateTime;

const MANUFACTURER: &str = "Jullix";

pub type SnapshotSource = watch::Receiver<Arc<Snapshot>>;

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::Display)]
#[serde(untagged)]
pub enum SensorValue {
    #[display("{_0}")]
    Integer(i64),
    #[display("{_0}")]
    Unsigned(u64),
    #[display("{_0}")]
    Float(f64),
    #[display("{_0}")]
    Boolean(bool),
    #[display("{_0}")]
    Text(String),
    #[display("{_0}")]
    Timestamp(DateTime),
    #[display("{_0}")]
    Json(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
}

///What the host shows for a sensor at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub name: String,
    pub value: Option<SensorValue>,
    pub unit: Option<String>,
    pub icon: Option<&'static str>,
}

///A single leaf value of one device. Values are looked up in the latest snapshot on every read.
#[derive(Debug, Clone)]
pub struct JullixSensor {
    category: Category,
    key: String,
    device_id: String,
    name_base: String,
    name: String,
    unique_id: String,
    unit: Option<String>,
    snapshot: SnapshotSource,
}

impl JullixSensor {
    pub fn new(
        category: Category,
        key: &str,
        device_id: &str,
        name_base: &str,
        unit: Option<&str>,
        snapshot: SnapshotSource,
    ) -> Self {
        Self {
            category,
            key: key.to_owned(),
            device_id: device_id.to_owned(),
            name_base: name_base.to_owned(),
            name: format!("{} {}", name_base, humanize(key)),
            unique_id: format!("jullix_{}_{}_{}", category, device_id, key),
            unit: unit.map(str::to_owned),
            snapshot,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn icon(&self) -> Option<&'static str> {
        Some(self.category.icon())
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifier: format!("{}_{}", self.category, self.device_id),
            name: self.name_base.clone(),
            manufacturer: MANUFACTURER,
            model: self.category.title(),
        }
    }

    pub fn value(&self) -> Option<SensorValue> {
        //clone the Arc so the watch lock is not held while flattening
        let snapshot = self.snapshot.borrow().clone();
        read_value(&snapshot, self.category, &self.device_id, &self.key)
    }

    pub fn state(&self) -> SensorState {
        SensorState {
            unique_id: self.unique_id.clone(),
            name: self.name.clone(),
            value: self.value(),
            unit: self.unit.clone(),
            icon: self.icon(),
        }
    }
}

pub fn read_value(snapshot: &Snapshot, category: Category, device_id: &str, key: &str) -> Option<SensorValue> {
    let sample = snapshot.sample(category, device_id)?;
    let value = flatten_sample(sample).remove(key)?;

    if category.is_timestamp_key(key) && !is_blank(&value) {
        return match DateTime::from_compact(&value) {
            Ok(dt) => Some(SensorValue::Timestamp(dt)),
            Err(e) => {
                tracing::error!("Unable to parse timestamp {} for sensor {}: {}", value, key, e);
                None
            }
        };
    }

    to_sensor_value(value)
}

fn to_sensor_value(value: Value) -> Option<SensorValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(SensorValue::Boolean(b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(SensorValue::Integer(i))
            } else if let Some(u) = n.as_u64() {
                Some(SensorValue::Unsigned(u))
            } else {
                n.as_f64().map(|f| SensorValue::Float(round2(f)))
            }
        }
        Value::String(s) => Some(SensorValue::Text(s)),
        json @ (Value::Array(_) | Value::Object(_)) => Some(SensorValue::Json(json)),
    }
}

//timestamps equal to 0 or "" are not converted
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

//2^53, from here on every f64 is a whole number
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

///Rounds the exact binary value to 2 decimals, ties to even
fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= EXACT_INTEGER_LIMIT {
        return value;
    }

    format!("{value:.2}").parse().unwrap_or(value)
}

///`captar_month_max` becomes `Captar Month Max`. A letter following a non-letter is upper-cased.
fn humanize(key: &str) -> String {
    let mut prev_is_letter = false;

    key.chars()
        .map(|c| if c == '_' { ' ' } else { c })
        .flat_map(|c| {
            let cased: Vec<char> = if prev_is_letter {
                c.to_lowercase().collect()
            } else {
                c.to_uppercase().collect()
            };
            prev_is_letter = c.is_alphabetic();
            cased
        })
        .collect()
}
