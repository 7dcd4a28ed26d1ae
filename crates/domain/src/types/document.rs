//! Remote document model
//!
//! A minimal, schema-less view of the managed document database: documents
//! addressed by slash-separated path segments, holding a flat map of typed
//! field values. `ServerTimestamp` is a write-only sentinel that the store
//! replaces with its own clock.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EventideError, Result};

/// Field map of a single document.
pub type Fields = BTreeMap<String, FieldValue>;

/// Typed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    /// Resolved to the store's clock on write.
    ServerTimestamp,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    /// Replace the server-timestamp sentinel with `now`.
    pub fn resolve(self, now: DateTime<Utc>) -> Self {
        match self {
            Self::ServerTimestamp => Self::Timestamp(now),
            other => other,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::String)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

impl Document {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn get_timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field).and_then(FieldValue::as_timestamp)
    }
}

/// Path to a document (even segment count) or collection (odd count).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// Build a path from segments. Empty segments and segments containing
    /// `/` are rejected.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(EventideError::InvalidInput("document path cannot be empty".into()));
        }
        if let Some(bad) = segments.iter().find(|s| s.is_empty() || s.contains('/')) {
            return Err(EventideError::InvalidInput(format!("invalid path segment: {bad:?}")));
        }
        Ok(Self { segments })
    }

    /// Parse a slash-separated path such as `events/evt-42/attendees`.
    pub fn parse(path: &str) -> Result<Self> {
        Self::new(path.trim_matches('/').split('/'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_document(&self) -> bool {
        self.segments.len() % 2 == 0
    }

    pub fn is_collection(&self) -> bool {
        !self.is_document()
    }

    /// Last segment (document id or collection name).
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Append a segment, e.g. a document id to a collection path.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self> {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self::new(segments)
    }

    /// Parent collection of a document path.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self { segments: self.segments[..self.segments.len() - 1].to_vec() })
    }

    pub fn ensure_document(&self) -> Result<()> {
        if self.is_document() {
            Ok(())
        } else {
            Err(EventideError::InvalidInput(format!("{self} is a collection path")))
        }
    }

    pub fn ensure_collection(&self) -> Result<()> {
        if self.is_collection() {
            Ok(())
        } else {
            Err(EventideError::InvalidInput(format!("{self} is a document path")))
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Sort direction for collection listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Single-field ordering for collection listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Desc }
    }
}
