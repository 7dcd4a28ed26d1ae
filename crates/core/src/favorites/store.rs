//! Favorites store
//!
//! One instance owns the favorites for the running session. Every mutation
//! rewrites the whole set under the `favorites` cache key, and observers get
//! the new snapshot through a `watch` channel.

use std::sync::Arc;

use eventide_domain::constants::{FAVORITES_CACHE_KEY, PUSH_TOKEN_CACHE_KEY};
use eventide_domain::{EventSummary, FavoriteSet};
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::cache_ports::KeyValueCache;
use crate::notifications::FavoriteNotifier;

/// Shared favorites state with on-device persistence.
pub struct FavoritesStore {
    cache: Arc<dyn KeyValueCache>,
    notifier: Option<Arc<dyn FavoriteNotifier>>,
    // Serializes mutate-then-persist so writes reach the cache in order.
    set: Mutex<FavoriteSet>,
    snapshot: watch::Sender<Vec<EventSummary>>,
}

impl FavoritesStore {
    /// Build the store from whatever the cache holds. A missing key, a read
    /// fault or a malformed blob all start from an empty set.
    pub async fn load(cache: Arc<dyn KeyValueCache>) -> Self {
        let set = match cache.get_string(FAVORITES_CACHE_KEY).await {
            Ok(Some(raw)) => FavoriteSet::from_json(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "Ignoring malformed favorites blob");
                FavoriteSet::new()
            }),
            Ok(None) => FavoriteSet::new(),
            Err(err) => {
                warn!(error = %err, "Failed to read favorites");
                FavoriteSet::new()
            }
        };
        debug!(count = set.len(), "Favorites loaded");

        let (snapshot, _) = watch::channel(set.to_vec());
        Self { cache, notifier: None, set: Mutex::new(set), snapshot }
    }

    /// Send a "favorited" push through `notifier` whenever a new favorite is
    /// added and a device token is registered.
    pub fn with_notifier(mut self, notifier: Arc<dyn FavoriteNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Add `event` unless its id is already a favorite. Returns whether the
    /// set changed.
    pub async fn add_favorite(&self, event: EventSummary) -> bool {
        let name = event.name.clone();
        {
            let mut set = self.set.lock().await;
            if !set.insert(event) {
                return false;
            }
            self.publish(&set).await;
        }
        self.notify(&name).await;
        true
    }

    /// Remove the favorite with `event_id`. Removing an absent id is a no-op.
    pub async fn remove_favorite(&self, event_id: &str) -> bool {
        let mut set = self.set.lock().await;
        if !set.remove(event_id) {
            return false;
        }
        self.publish(&set).await;
        true
    }

    /// Current favorites in insertion order.
    pub fn list_favorites(&self) -> Vec<EventSummary> {
        self.snapshot.borrow().clone()
    }

    pub fn is_favorite(&self, event_id: &str) -> bool {
        self.snapshot.borrow().iter().any(|event| event.id == event_id)
    }

    /// Receive a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<EventSummary>> {
        self.snapshot.subscribe()
    }

    /// Drop every favorite and persist the empty set.
    pub async fn clear(&self) {
        let mut set = self.set.lock().await;
        set.clear();
        self.publish(&set).await;
    }

    async fn publish(&self, set: &FavoriteSet) {
        self.snapshot.send_replace(set.to_vec());

        let raw = match serde_json::to_string(set) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "Failed to encode favorites");
                return;
            }
        };
        if let Err(err) = self.cache.set_string(FAVORITES_CACHE_KEY, &raw).await {
            warn!(error = %err, "Failed to persist favorites");
        }
    }

    async fn notify(&self, event_name: &str) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let token = match self.cache.get_string(PUSH_TOKEN_CACHE_KEY).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No push token registered; skipping favorite notification");
                return;
            }
            Err(err) => {
                warn!(error = %err, "Failed to read push token");
                return;
            }
        };
        if let Err(err) = notifier.notify_favorited(event_name, &token).await {
            warn!(error = %err, event_name, "Favorite notification failed");
        }
    }
}
