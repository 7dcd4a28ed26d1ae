//! RapidAPI-hosted event listing client
//!
//! `GET {base_url}/all_event?city=..&state=..&page=..` with the
//! `x-rapidapi-key` / `x-rapidapi-host` header pair.

use async_trait::async_trait;
use eventide_core::EventSource;
use eventide_domain::{EventSummary, EventideError, EventsApiConfig, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use super::mapping::map_listing;
use crate::http::HttpClient;

/// [`EventSource`] backed by the listing API.
pub struct RapidApiEventSource {
    http: HttpClient,
    config: EventsApiConfig,
}

impl RapidApiEventSource {
    pub fn new(http: HttpClient, config: EventsApiConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl EventSource for RapidApiEventSource {
    #[instrument(skip(self))]
    async fn fetch_events(&self, city: &str, state: &str) -> Result<Vec<EventSummary>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| EventideError::Config("events API key is not configured".into()))?;

        let url = format!("{}/all_event", self.config.base_url.trim_end_matches('/'));
        let page = self.config.page.to_string();
        let request = self
            .http
            .request(Method::GET, &url)
            .query(&[("city", city), ("state", state), ("page", page.as_str())])
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", &self.config.host);

        let body: Value = self.http.send_json(request).await?;
        let events = map_listing(&body);
        debug!(count = events.len(), "Mapped listing response");
        Ok(events)
    }
}
