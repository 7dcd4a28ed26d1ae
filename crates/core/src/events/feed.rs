//! Event feed - the current batch of fetched listings

use std::sync::Arc;

use eventide_domain::constants::NEARBY_EVENTS_LIMIT;
use eventide_domain::EventSummary;
use parking_lot::RwLock;
use tracing::{error, info};

use super::ports::EventSource;

/// Holds the most recent successful fetch.
pub struct EventFeed {
    source: Arc<dyn EventSource>,
    current: RwLock<Vec<EventSummary>>,
}

impl EventFeed {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self { source, current: RwLock::new(Vec::new()) }
    }

    /// Fetch listings for `city`, `state`.
    ///
    /// Never fails: any source error is logged and yields an empty batch,
    /// which leaves the previous batch in place.
    pub async fn fetch_events(&self, city: &str, state: &str) -> Vec<EventSummary> {
        match self.source.fetch_events(city, state).await {
            Ok(events) => {
                info!(city, state, count = events.len(), "Fetched events");
                *self.current.write() = events.clone();
                events
            }
            Err(err) => {
                error!(city, state, error = %err, "Error fetching events");
                Vec::new()
            }
        }
    }

    /// The last successfully fetched batch.
    pub fn current(&self) -> Vec<EventSummary> {
        self.current.read().clone()
    }

    /// The first `limit` events of the current batch.
    pub fn nearby(&self, limit: usize) -> Vec<EventSummary> {
        self.current.read().iter().take(limit).cloned().collect()
    }

    /// The home screen preview.
    pub fn highlights(&self) -> Vec<EventSummary> {
        self.nearby(NEARBY_EVENTS_LIMIT)
    }

    pub fn find(&self, event_id: &str) -> Option<EventSummary> {
        self.current.read().iter().find(|event| event.id == event_id).cloned()
    }
}
