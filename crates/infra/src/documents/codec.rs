//! Typed JSON wire format for document fields
//!
//! Each field is a single-key object naming its type, e.g.
//! `{"stringValue": "abc"}` or `{"timestampValue": "2025-06-01T19:00:00Z"}`.
//! `{"serverTimestampValue": "REQUEST_TIME"}` asks the server to stamp the
//! field on write.

use chrono::{DateTime, Utc};
use eventide_domain::{Document, FieldValue, Fields};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Document as sent to and returned by the REST API.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl WireDocument {
    pub fn from_fields(fields: &Fields) -> Self {
        let fields = fields.iter().map(|(name, value)| (name.clone(), encode(value))).collect();
        Self { id: None, fields }
    }

    /// Convert to a domain document; `fallback_id` is used when the server
    /// omits the id.
    pub fn into_document(self, fallback_id: &str) -> Document {
        let fields = self
            .fields
            .into_iter()
            .filter_map(|(name, value)| match decode(&value) {
                Some(decoded) => Some((name, decoded)),
                None => {
                    debug!(field = %name, "Dropping field with unknown wire type");
                    None
                }
            })
            .collect();
        Document { id: self.id.unwrap_or_else(|| fallback_id.to_string()), fields }
    }
}

pub(crate) fn encode(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(flag) => json!({ "booleanValue": flag }),
        // NaN and infinities have no JSON number form.
        FieldValue::Number(number) if !number.is_finite() => json!({ "nullValue": null }),
        FieldValue::Number(number) => json!({ "doubleValue": number }),
        FieldValue::String(text) => json!({ "stringValue": text }),
        FieldValue::Timestamp(at) => json!({ "timestampValue": at.to_rfc3339() }),
        FieldValue::ServerTimestamp => json!({ "serverTimestampValue": "REQUEST_TIME" }),
    }
}

pub(crate) fn decode(value: &Value) -> Option<FieldValue> {
    let object = value.as_object()?;
    let (kind, inner) = object.iter().next()?;
    match kind.as_str() {
        "nullValue" => Some(FieldValue::Null),
        "booleanValue" => inner.as_bool().map(FieldValue::Bool),
        "doubleValue" => inner.as_f64().map(FieldValue::Number),
        // Integers travel as decimal strings.
        "integerValue" => match inner {
            Value::String(raw) => raw.parse::<i64>().ok().map(|n| FieldValue::Number(n as f64)),
            other => other.as_f64().map(FieldValue::Number),
        },
        "stringValue" => inner.as_str().map(|text| FieldValue::String(text.to_string())),
        "timestampValue" => inner
            .as_str()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| FieldValue::Timestamp(at.with_timezone(&Utc))),
        _ => None,
    }
}
