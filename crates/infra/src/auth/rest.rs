//! Identity-toolkit style REST client
//!
//! Endpoints (all `POST {auth_url}/accounts:<op>?key=<api_key>`):
//! - `signInWithPassword` and `signUp` with `{email, password, returnSecureToken}`
//! - `signInWithIdp` with a form-encoded `postBody` carrying the provider's
//!   ID token
//!
//! Failures come back as `{"error": {"message": "EMAIL_NOT_FOUND", ...}}`.

use async_trait::async_trait;
use eventide_core::AuthProvider;
use eventide_domain::{AuthUser, BackendConfig, EventideError, Result, Session};
use parking_lot::RwLock;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::token::AccessTokenProvider;
use crate::errors::ApiError;
use crate::http::HttpClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest {
    post_body: String,
    request_uri: &'static str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// REST-backed [`AuthProvider`] holding the session in memory.
pub struct RestAuthProvider {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    session: RwLock<Option<Session>>,
}

impl RestAuthProvider {
    pub fn new(http: HttpClient, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            session: RwLock::new(None),
        }
    }

    pub fn from_config(http: HttpClient, config: &BackendConfig) -> Self {
        Self::new(http, config.auth_url.clone(), config.api_key.clone())
    }

    async fn call<B: Serialize + Sync>(&self, operation: &str, body: &B) -> Result<Session> {
        let url = format!("{}/accounts:{operation}", self.base_url);
        let mut request = self.http.request(Method::POST, &url).json(body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_auth_failure(status, &url, &body));
        }

        let payload: AuthResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(format!("invalid auth response: {err}")))?;
        let session = Session {
            user: AuthUser {
                uid: payload.local_id,
                email: payload.email,
                display_name: payload.display_name.filter(|name| !name.is_empty()),
            },
            id_token: payload.id_token,
            refresh_token: payload.refresh_token,
        };

        *self.session.write() = Some(session.clone());
        debug!(operation, uid = %session.user.uid, "Auth session established");
        Ok(session)
    }
}

/// Identity-toolkit codes are reported verbatim so the UI can show them;
/// anything else is classified by status.
fn map_auth_failure(status: reqwest::StatusCode, url: &str, body: &str) -> EventideError {
    if status.is_client_error() {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            return EventideError::Auth(envelope.error.message);
        }
    }
    ApiError::from_status(status, url, body).into()
}

#[async_trait]
impl AuthProvider for RestAuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        self.call(
            "signInWithPassword",
            &PasswordRequest { email, password, return_secure_token: true },
        )
        .await
    }

    async fn sign_up_with_password(&self, email: &str, password: &str) -> Result<Session> {
        self.call("signUp", &PasswordRequest { email, password, return_secure_token: true }).await
    }

    async fn sign_in_with_id_token(&self, provider_id: &str, id_token: &str) -> Result<Session> {
        let post_body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("id_token", id_token)
            .append_pair("providerId", provider_id)
            .finish();
        self.call(
            "signInWithIdp",
            &IdpRequest {
                post_body,
                request_uri: "http://localhost",
                return_secure_token: true,
                return_idp_credential: true,
            },
        )
        .await
    }

    fn current_session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    fn restore_session(&self, session: Session) {
        *self.session.write() = Some(session);
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.session.write().take() {
            info!(uid = %session.user.uid, "Session cleared");
        }
        Ok(())
    }
}

#[async_trait]
impl AccessTokenProvider for RestAuthProvider {
    async fn access_token(&self) -> Result<String> {
        self.session
            .read()
            .as_ref()
            .map(|session| session.id_token.clone())
            .ok_or(EventideError::AuthenticationRequired)
    }
}
