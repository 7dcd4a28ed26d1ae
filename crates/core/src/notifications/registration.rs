//! Device push token registration

use std::sync::Arc;

use eventide_domain::constants::PUSH_TOKEN_CACHE_KEY;
use eventide_domain::{EventideError, FieldValue, Result};
use tracing::{debug, warn};

use crate::auth::AuthProvider;
use crate::cache_ports::KeyValueCache;
use crate::document_ports::DocumentStore;
use crate::utils::{fields, paths};

/// Stores the device's push token locally and on the user's profile.
pub struct PushRegistration {
    auth: Arc<dyn AuthProvider>,
    documents: Arc<dyn DocumentStore>,
    cache: Arc<dyn KeyValueCache>,
}

impl PushRegistration {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        documents: Arc<dyn DocumentStore>,
        cache: Arc<dyn KeyValueCache>,
    ) -> Self {
        Self { auth, documents, cache }
    }

    /// Record `token` on-device and, when signed in, merge it into
    /// `users/{uid}` as `fcmToken`.
    pub async fn register_token(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(EventideError::InvalidInput("push token cannot be empty".into()));
        }

        self.cache.set_string(PUSH_TOKEN_CACHE_KEY, token).await?;

        match self.auth.current_user() {
            Some(user) => {
                let path = paths::user(&user.uid)?;
                self.documents.update(&path, fields([("fcmToken", FieldValue::from(token))])).await?;
                debug!(uid = %user.uid, "Push token attached to profile");
            }
            None => debug!("Push token stored locally; no session to attach it to"),
        }
        Ok(())
    }

    /// The registered token, if any. Read faults count as no token.
    pub async fn token(&self) -> Option<String> {
        match self.cache.get_string(PUSH_TOKEN_CACHE_KEY).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Failed to read push token");
                None
            }
        }
    }
}
