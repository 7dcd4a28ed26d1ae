//! Port interfaces for the managed authentication service
//!
//! Identity and credential issuance are delegated; the client only signs in,
//! reads the current session and signs out.

use async_trait::async_trait;
use eventide_domain::{AuthUser, Result, Session};

/// Trait for the external identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Create an account with email and password and sign it in.
    async fn sign_up_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Exchange a third-party identity token (e.g. a Google ID token) for a
    /// session.
    async fn sign_in_with_id_token(&self, provider_id: &str, id_token: &str) -> Result<Session>;

    /// The currently signed-in session, if any.
    fn current_session(&self) -> Option<Session>;

    /// Reinstate a session persisted from an earlier run.
    fn restore_session(&self, session: Session);

    /// Drop the current session.
    async fn sign_out(&self) -> Result<()>;

    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<AuthUser> {
        self.current_session().map(|session| session.user)
    }
}
