//! Bearer token sources for authenticated requests

use async_trait::async_trait;
use eventide_domain::{EventideError, Result};

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a bearer token. Fails with `AuthenticationRequired` when no
    /// credential is available.
    async fn access_token(&self) -> Result<String>;
}

/// Fixed token, e.g. a server credential read from configuration.
pub struct StaticAccessToken(String);

impl StaticAccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenProvider for StaticAccessToken {
    async fn access_token(&self) -> Result<String> {
        if self.0.is_empty() {
            return Err(EventideError::AuthenticationRequired);
        }
        Ok(self.0.clone())
    }
}

/// Token for an optionally authenticated request: `None` when signed out,
/// other failures propagate.
pub(crate) async fn optional_token(provider: &dyn AccessTokenProvider) -> Result<Option<String>> {
    match provider.access_token().await {
        Ok(token) => Ok(Some(token)),
        Err(EventideError::AuthenticationRequired) => Ok(None),
        Err(err) => Err(err),
    }
}
