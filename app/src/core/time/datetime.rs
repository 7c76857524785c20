use std::fmt::Display;

use chrono::{NaiveDateTime, Utc};
use serde_json::Value;

///Layout of the meter timestamps, e.g. `250518214500`
const COMPACT_FORMAT: &str = "%y%m%d%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DateTime {
    delegate: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CompactTimestampError {
    #[display("Unsupported timestamp value {_0}")]
    UnsupportedValue(#[error(not(source))] String),

    #[display("Invalid timestamp {value}: {source}")]
    InvalidFormat { value: String, source: chrono::ParseError },
}

impl DateTime {
    fn new<T: chrono::TimeZone>(delegate: chrono::DateTime<T>) -> Self {
        Self {
            delegate: delegate.with_timezone(&Utc),
        }
    }

    pub fn now() -> Self {
        Utc::now().into()
    }

    ///Decodes a `YYMMDDHHMMSS` timestamp, given either as JSON number or text. The device reports UTC.
    pub fn from_compact(value: &Value) -> Result<Self, CompactTimestampError> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) if n.is_u64() || n.is_i64() => n.to_string(),
            other => return Err(CompactTimestampError::UnsupportedValue(other.to_string())),
        };

        let naive = NaiveDateTime::parse_from_str(&text, COMPACT_FORMAT)
            .map_err(|source| CompactTimestampError::InvalidFormat { value: text, source })?;

        Ok(naive.and_utc().into())
    }

    pub fn to_iso_string(&self) -> String {
        self.delegate.to_rfc3339()
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_iso_string())
    }
}

impl<T: chrono::TimeZone> From<chrono::DateTime<T>> for DateTime {
    fn from(val: chrono::DateTime<T>) -> Self {
        DateTime::new(val)
    }
}
