//! User, session and profile types
//!
//! Identity is delegated to a managed auth service; these types carry only
//! what the client needs to key remote records and label chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// Application role stored on the user profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl_domain_enum_conversions!(UserRole {
    User => "user",
    Admin => "admin",
});

/// Signed-in user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable user identifier issued by the auth service
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Authenticated session, persisted on-device so it survives restarts.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// Tokens stay out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Profile document stored at `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>,
    pub fcm_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn role_parses_and_defaults_to_user() {
        assert_eq!(UserRole::from_str("ADMIN").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::default(), UserRole::User);
        assert!(UserRole::from_str("owner").is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "admin");
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let session = Session {
            user: AuthUser { uid: "abc123".into(), email: None, display_name: None },
            id_token: "secret-token".into(),
            refresh_token: Some("refresh-secret".into()),
        };
        let rendered = format!("{session:?}");
        assert!(rendered.contains("abc123"));
        assert!(!rendered.contains("secret-token"));
        assert!(!rendered.contains("refresh-secret"));
    }
}
