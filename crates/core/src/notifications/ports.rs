//! Port interfaces for push delivery

use async_trait::async_trait;
use eventide_domain::Result;
use serde::{Deserialize, Serialize};

/// A single notification addressed to one device token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
}

/// Managed push messaging service.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(&self, message: PushMessage) -> Result<()>;
}

/// Client side of the "event favorited" callable function.
#[async_trait]
pub trait FavoriteNotifier: Send + Sync {
    async fn notify_favorited(&self, event_name: &str, token: &str) -> Result<()>;
}
