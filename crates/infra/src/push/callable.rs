//! Callable-function client for favorite notifications
//!
//! `POST {functions_url}/notifyOnFavorite` with `{"data": {eventName, fcmToken}}`.
//! Success is `{"result": {"success": true}}`; failures carry
//! `{"error": {"status": "INVALID_ARGUMENT" | "INTERNAL", "message": ..}}`.

use std::sync::Arc;

use async_trait::async_trait;
use eventide_core::{FavoriteNotifier, NotifyRequest, NotifyResponse};
use eventide_domain::{BackendConfig, EventideError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::auth::token::optional_token;
use crate::auth::AccessTokenProvider;
use crate::errors::ApiError;
use crate::http::HttpClient;

const FUNCTION_NAME: &str = "notifyOnFavorite";

#[derive(Serialize)]
struct CallableRequest<'a> {
    data: &'a NotifyRequest,
}

#[derive(Deserialize)]
struct CallableResponse {
    result: NotifyResponse,
}

#[derive(Deserialize)]
struct CallableErrorEnvelope {
    error: CallableError,
}

#[derive(Deserialize)]
struct CallableError {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

impl From<CallableError> for EventideError {
    fn from(err: CallableError) -> Self {
        match err.status.as_str() {
            "INVALID_ARGUMENT" => EventideError::ValidationMissing(err.message),
            "INTERNAL" => EventideError::Internal(err.message),
            "UNAUTHENTICATED" => EventideError::AuthenticationRequired,
            _ => EventideError::RemoteUnavailable(format!("{}: {}", err.status, err.message)),
        }
    }
}

/// [`FavoriteNotifier`] calling the hosted function over HTTPS.
pub struct CallableFavoriteNotifier {
    http: HttpClient,
    functions_url: String,
    auth: Arc<dyn AccessTokenProvider>,
}

impl CallableFavoriteNotifier {
    pub fn new(
        http: HttpClient,
        functions_url: impl Into<String>,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self { http, functions_url: functions_url.into().trim_end_matches('/').to_string(), auth }
    }

    pub fn from_config(
        http: HttpClient,
        config: &BackendConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self::new(http, config.functions_url.clone(), auth)
    }
}

#[async_trait]
impl FavoriteNotifier for CallableFavoriteNotifier {
    #[instrument(skip(self, token))]
    async fn notify_favorited(&self, event_name: &str, token: &str) -> Result<()> {
        let url = format!("{}/{FUNCTION_NAME}", self.functions_url);
        let payload = NotifyRequest::new(event_name, token);
        let mut request =
            self.http.request(Method::POST, &url).json(&CallableRequest { data: &payload });
        if let Some(bearer) = optional_token(self.auth.as_ref()).await? {
            request = request.bearer_auth(bearer);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Network(format!("failed to read callable response: {err}")))?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<CallableErrorEnvelope>(&body) {
                return Err(envelope.error.into());
            }
            return Err(ApiError::from_status(status, &url, &body).into());
        }

        let parsed: CallableResponse = serde_json::from_str(&body)
            .map_err(|err| ApiError::Decode(format!("invalid callable response: {err}")))?;
        debug!(success = parsed.result.success, "Callable function returned");
        if parsed.result.success {
            Ok(())
        } else {
            Err(EventideError::Internal("Push failed".into()))
        }
    }
}
