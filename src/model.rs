//! Gateway model descriptors and probe results.

use crate::media::MediaType;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

/// A model as advertised by `GET /api/{provider}/models`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelDescriptor {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "optional_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub video: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub audio: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub image: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub vision: bool,
}

impl ModelDescriptor {
    /// Declared type, or `unknown` when the gateway left it out.
    pub fn kind_or_unknown(&self) -> &str {
        self.kind.as_deref().unwrap_or("unknown")
    }
}

/// One (provider, model) pair produced by discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeTarget {
    pub provider: String,
    pub model: ModelDescriptor,
}

/// Outcome of probing one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub provider: String,
    pub model: String,
    pub working: bool,
    pub response_time: Duration,
    pub error: Option<String>,
    pub media_type: MediaType,
}

impl ProbeResult {
    /// Elapsed time in fractional seconds.
    pub fn response_secs(&self) -> f64 {
        self.response_time.as_secs_f64()
    }

    /// Serialized `provider|model|media_type` form.
    pub fn report_line(&self) -> String {
        format!("{}|{}|{}", self.provider, self.model, self.media_type)
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|v| is_truthy(&v))
}

fn optional_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    optional_string(deserializer).map(Option::unwrap_or_default)
}
