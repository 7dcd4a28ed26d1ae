use std::time::Duration;

use eventide_domain::constants::HTTP_TIMEOUT_SECS;
use eventide_domain::{EventideError, HttpConfig};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{ApiError, InfraError};

/// HTTP client with timeout support.
///
/// Requests are sent exactly once; callers surface failures to the user
/// instead of retrying.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, EventideError> {
        Self::builder().build()
    }

    /// Client configured from the shared HTTP settings.
    pub fn from_config(config: &HttpConfig) -> Result<Self, EventideError> {
        let mut builder = Self::builder().timeout(Duration::from_secs(config.timeout_seconds));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, EventideError> {
        let request = builder.build().map_err(|err| EventideError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %redact_query(&url), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, url = %redact_query(&url), %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, url = %redact_query(&url), error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }

    /// Send and decode a JSON body, classifying non-success statuses.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, EventideError> {
        let response = ensure_success(self.send(builder).await?).await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(format!("failed to parse response: {err}")).into())
    }
}

/// Turn a non-success response into an [`ApiError`].
pub async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = redact_query(response.url());
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_status(status, &url, &body))
}

// API keys travel as query parameters; keep them out of logs and errors.
fn redact_query(url: &url::Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, EventideError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| EventideError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Method, StatusCode};
    use serde::Deserialize;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn returns_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn send_json_classifies_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        #[derive(Debug, Deserialize)]
        struct Empty {}

        let client = HttpClient::new().unwrap();
        let err = client
            .send_json::<Empty>(client.request(Method::GET, format!("{}/x?key=secret", server.uri())))
            .await
            .unwrap_err();

        match err {
            EventideError::RemoteUnavailable(msg) => {
                assert!(msg.contains("502"));
                assert!(!msg.contains("secret"));
            }
            other => panic!("expected remote unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_remote_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let client = HttpClient::new().unwrap();
        let result = client.send(client.request(Method::GET, format!("http://{addr}"))).await;

        assert!(matches!(result, Err(EventideError::RemoteUnavailable(_))));
    }
}
