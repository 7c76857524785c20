use std::collections::BTreeMap;

use serde_json::Value;

///Leaf values of a document keyed by their `_`-joined path
pub type FlatSample = BTreeMap<String, Value>;

///Flattens nested objects into path keys. Arrays are leaves and are not descended into.
pub fn flatten(value: &Value) -> FlatSample {
    let mut out = FlatSample::new();
    flatten_into(value, "", &mut out);
    out
}

pub fn flatten_sample(sample: &serde_json::Map<String, Value>) -> FlatSample {
    let mut out = FlatSample::new();
    flatten_entries(sample, "", &mut out);
    out
}

fn flatten_into(value: &Value, path: &str, out: &mut FlatSample) {
    match value {
        Value::Object(map) => flatten_entries(map, path, out),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
            out.insert(path.to_owned(), value.clone());
        }
    }
}

fn flatten_entries(map: &serde_json::Map<String, Value>, path: &str, out: &mut FlatSample) {
    for (key, value) in map {
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}_{key}")
        };

        flatten_into(value, &child_path, out);
    }
}
