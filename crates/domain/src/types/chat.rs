//! Per-event chat and admin event drafts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message posted under `events/{eventId}/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Raw form input for an admin-created event.
///
/// Coordinates arrive as text and are parsed on submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    pub summary: String,
    pub address: String,
    pub category: String,
    pub start_date: String,
    pub start_time: String,
    pub end_time: String,
    pub latitude: String,
    pub longitude: String,
}

impl EventDraft {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("start_date", &self.start_date),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
