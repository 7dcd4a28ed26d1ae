//! Authentication service - sign-in flows, profile bootstrap and session
//! persistence

use std::str::FromStr;
use std::sync::Arc;

use eventide_domain::constants::{GOOGLE_PROVIDER_ID, SESSION_CACHE_KEY};
use eventide_domain::{AuthUser, EventideError, FieldValue, Result, Session, UserRole};
use tracing::{debug, info, warn};

use super::ports::AuthProvider;
use crate::cache_ports::KeyValueCache;
use crate::document_ports::DocumentStore;
use crate::utils::{fields, paths};

/// Authentication service
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    documents: Arc<dyn DocumentStore>,
    cache: Arc<dyn KeyValueCache>,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        documents: Arc<dyn DocumentStore>,
        cache: Arc<dyn KeyValueCache>,
    ) -> Self {
        Self { provider, documents, cache }
    }

    /// Reinstate the session persisted by a previous run.
    ///
    /// An unreadable entry is discarded so it cannot fail every start.
    pub async fn restore(&self) -> Option<AuthUser> {
        let raw = match self.cache.get_string(SESSION_CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "Failed to read persisted session");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                let user = session.user.clone();
                self.provider.restore_session(session);
                debug!(uid = %user.uid, "Restored persisted session");
                Some(user)
            }
            Err(err) => {
                warn!(error = %err, "Discarding malformed persisted session");
                if let Err(err) = self.cache.delete(SESSION_CACHE_KEY).await {
                    warn!(error = %err, "Failed to discard persisted session");
                }
                None
            }
        }
    }

    /// Create an account and its `users/{uid}` profile with the given role.
    pub async fn sign_up_with_email(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<AuthUser> {
        let session = self.provider.sign_up_with_password(email, password).await?;
        let user = session.user.clone();
        self.write_profile(&user, role).await?;
        self.persist(&session).await;
        info!(uid = %user.uid, role = %role, "Account created");
        Ok(user)
    }

    pub async fn login_with_email(&self, email: &str, password: &str) -> Result<AuthUser> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        self.persist(&session).await;
        info!(uid = %session.user.uid, "Signed in with email");
        Ok(session.user)
    }

    /// Sign in with a Google ID token, creating a `user` profile on first
    /// sign-in.
    pub async fn sign_in_with_google(&self, id_token: &str) -> Result<AuthUser> {
        if id_token.trim().is_empty() {
            return Err(EventideError::Auth("No ID token returned from Google Sign-In".into()));
        }

        let session = self.provider.sign_in_with_id_token(GOOGLE_PROVIDER_ID, id_token).await?;
        let user = session.user.clone();

        let profile_path = paths::user(&user.uid)?;
        if self.documents.get(&profile_path).await?.is_none() {
            self.write_profile(&user, UserRole::User).await?;
            debug!(uid = %user.uid, "Created profile for first Google sign-in");
        }

        self.persist(&session).await;
        info!(uid = %user.uid, "Signed in with Google");
        Ok(user)
    }

    /// Stored role for `uid`. A missing profile or unknown role reads as
    /// `User`.
    pub async fn user_role(&self, uid: &str) -> Result<UserRole> {
        let profile = self.documents.get(&paths::user(uid)?).await?;
        let role = profile
            .as_ref()
            .and_then(|doc| doc.get_str("role"))
            .and_then(|raw| UserRole::from_str(raw).ok())
            .unwrap_or_default();
        Ok(role)
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.provider.current_user()
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.provider.sign_out().await?;
        if let Err(err) = self.cache.delete(SESSION_CACHE_KEY).await {
            warn!(error = %err, "Failed to remove persisted session");
        }
        info!("Signed out");
        Ok(())
    }

    async fn write_profile(&self, user: &AuthUser, role: UserRole) -> Result<()> {
        let profile = fields([
            ("uid", FieldValue::from(user.uid.as_str())),
            ("email", FieldValue::from(user.email.clone())),
            ("role", FieldValue::from(role.to_string())),
            ("createdAt", FieldValue::ServerTimestamp),
        ]);
        self.documents.set(&paths::user(&user.uid)?, profile).await
    }

    async fn persist(&self, session: &Session) {
        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "Failed to encode session");
                return;
            }
        };
        if let Err(err) = self.cache.set_string(SESSION_CACHE_KEY, &raw).await {
            warn!(error = %err, "Failed to persist session");
        }
    }
}
