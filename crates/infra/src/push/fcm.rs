//! Messaging API push gateway
//!
//! `POST {messaging_url}/messages:send` with
//! `{"message": {"token", "notification": {"title", "body"}}}` and a server
//! bearer credential.

use std::sync::Arc;

use async_trait::async_trait;
use eventide_core::{PushGateway, PushMessage};
use eventide_domain::{BackendConfig, Result};
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::auth::{AccessTokenProvider, StaticAccessToken};
use crate::http::{ensure_success, HttpClient};

#[derive(Serialize)]
struct SendRequest<'a> {
    message: WireMessage<'a>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    token: &'a str,
    notification: WireNotification<'a>,
}

#[derive(Serialize)]
struct WireNotification<'a> {
    title: &'a str,
    body: &'a str,
}

/// [`PushGateway`] delivering single-device notifications.
pub struct FcmPushGateway {
    http: HttpClient,
    messaging_url: String,
    credentials: Arc<dyn AccessTokenProvider>,
}

impl FcmPushGateway {
    pub fn new(
        http: HttpClient,
        messaging_url: impl Into<String>,
        credentials: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            http,
            messaging_url: messaging_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Gateway using the configured static messaging token. A missing token
    /// surfaces as `AuthenticationRequired` on the first send.
    pub fn from_config(http: HttpClient, config: &BackendConfig) -> Self {
        let token = config.messaging_token.clone().unwrap_or_default();
        Self::new(http, config.messaging_url.clone(), Arc::new(StaticAccessToken::new(token)))
    }
}

#[async_trait]
impl PushGateway for FcmPushGateway {
    #[instrument(skip_all)]
    async fn send(&self, message: PushMessage) -> Result<()> {
        let bearer = self.credentials.access_token().await?;
        let url = format!("{}/messages:send", self.messaging_url);
        let payload = SendRequest {
            message: WireMessage {
                token: &message.token,
                notification: WireNotification { title: &message.title, body: &message.body },
            },
        };

        let request = self.http.request(Method::POST, &url).bearer_auth(bearer).json(&payload);
        ensure_success(self.http.send(request).await?).await?;
        debug!("Push message accepted");
        Ok(())
    }
}
