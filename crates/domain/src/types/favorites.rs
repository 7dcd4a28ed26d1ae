//! Session-scoped favorites collection

use serde::{Deserialize, Serialize};

use super::event::EventSummary;

/// Ordered set of favorited events keyed by event id.
///
/// Insertion order is preserved and no two entries share an id. Serializes
/// as a plain JSON array of events so the persisted blob stays readable by
/// older builds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    events: Vec<EventSummary>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an arbitrary list, keeping the first entry for each id.
    pub fn from_events(events: impl IntoIterator<Item = EventSummary>) -> Self {
        let mut set = Self::new();
        for event in events {
            set.insert(event);
        }
        set
    }

    /// Insert `event` unless its id is already present. Returns whether the
    /// set changed.
    pub fn insert(&mut self, event: EventSummary) -> bool {
        if self.contains(&event.id) {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Remove the entry with `event_id`. Returns whether the set changed.
    pub fn remove(&mut self, event_id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != event_id);
        self.events.len() != before
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.events.iter().any(|event| event.id == event_id)
    }

    pub fn get(&self, event_id: &str) -> Option<&EventSummary> {
        self.events.iter().find(|event| event.id == event_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventSummary> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn to_vec(&self) -> Vec<EventSummary> {
        self.events.clone()
    }

    /// Decode a persisted blob, dropping duplicate ids left by older writers.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let events: Vec<EventSummary> = serde_json::from_str(raw)?;
        Ok(Self::from_events(events))
    }
}
