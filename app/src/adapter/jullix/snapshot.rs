use std::collections::HashMap;

use serde_json::Value;

use super::Category;
use crate::core::time::DateTime;

///One device's record within a category payload
pub type Sample = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Single(Sample),
    Many(Vec<Sample>),
}

///Latest payload per category. Replaced as a whole on every refresh, never mutated.
#[derive(Debug, Clone)]
pub struct Snapshot {
    payloads: HashMap<Category, Payload>,
    created: DateTime,
}

impl Payload {
    ///Converts a fetched document. Empty or non-document responses count as absent.
    pub fn from_json(category: Category, value: Value) -> Option<Self> {
        match value {
            Value::Object(sample) if !sample.is_empty() => Some(Payload::Single(sample)),
            Value::Array(items) => {
                let samples: Vec<Sample> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(sample) => Some(sample),
                        other => {
                            tracing::warn!("Ignoring non-object entry in {} payload: {}", category, other);
                            None
                        }
                    })
                    .collect();

                if samples.is_empty() {
                    None
                } else {
                    Some(Payload::Many(samples))
                }
            }
            Value::Object(_) | Value::Null => None,
            other @ (Value::Bool(_) | Value::Number(_) | Value::String(_)) => {
                tracing::warn!("Unexpected {} payload: {}", category, other);
                None
            }
        }
    }

    pub fn samples(&self) -> &[Sample] {
        match self {
            Payload::Single(sample) => std::slice::from_ref(sample),
            Payload::Many(samples) => samples,
        }
    }

    ///Finds the sample of the given device. A single object is returned as is. In a list, an
    ///unknown device falls back to the first entry instead of being reported as missing.
    pub fn resolve(&self, category: Category, device_id: &str) -> Option<&Sample> {
        match self {
            Payload::Single(sample) => Some(sample),
            Payload::Many(samples) => samples
                .iter()
                .find(|sample| device_identity(sample, category) == device_id)
                .or_else(|| samples.first()),
        }
    }
}

impl Snapshot {
    pub fn new(payloads: HashMap<Category, Payload>) -> Self {
        Self {
            payloads,
            created: DateTime::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    pub fn get(&self, category: Category) -> Option<&Payload> {
        self.payloads.get(&category)
    }

    pub fn sample(&self, category: Category, device_id: &str) -> Option<&Sample> {
        self.get(category)?.resolve(category, device_id)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.payloads.contains_key(c))
    }

    pub fn created(&self) -> DateTime {
        self.created
    }
}

impl FromIterator<(Category, Option<Payload>)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (Category, Option<Payload>)>>(iter: I) -> Self {
        Snapshot::new(
            iter.into_iter()
                .filter_map(|(category, payload)| payload.map(|p| (category, p)))
                .collect(),
        )
    }
}

///`id`, else `meter`, else the category name. Empty, zero and null values are skipped.
pub fn device_identity(sample: &Sample, category: Category) -> String {
    ["id", "meter"]
        .iter()
        .filter_map(|field| sample.get(*field))
        .find(|value| is_truthy(value))
        .map(identity_text)
        .unwrap_or_else(|| category.as_str().to_owned())
}

///The `device` field if it holds a value, else a generic name of the category
pub fn name_base(sample: &Sample, category: Category) -> String {
    match sample.get("device") {
        Some(Value::String(name)) => name.clone(),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => value.to_string(),
        Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => format!("Jullix {}", category.title()),
    }
}

fn identity_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
