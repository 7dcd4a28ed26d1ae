//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CITY, DEFAULT_EVENTS_PAGE, DEFAULT_STATE, EVENTS_API_HOST, HTTP_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub events_api: EventsApiConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Third-party event listing API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsApiConfig {
    pub base_url: String,
    pub host: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub default_city: String,
    pub default_state: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

/// Managed backend endpoints (auth, documents, callable functions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub auth_url: String,
    pub documents_url: String,
    pub functions_url: String,
    #[serde(default = "default_messaging_url")]
    pub messaging_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Server credential for the messaging API; only needed where the
    /// favorite notification handler runs.
    #[serde(default, skip_serializing)]
    pub messaging_token: Option<String>,
}

/// On-device key-value cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: String,
    pub pool_size: u32,
    #[serde(default)]
    pub rsvp_policy: RsvpCachePolicy,
    #[serde(default = "default_true")]
    pub clear_favorites_on_sign_out: bool,
}

/// How a cached RSVP hint is treated when answering "am I attending".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpCachePolicy {
    /// A cached positive answers without a remote read. Can go stale when
    /// the record is removed elsewhere.
    #[default]
    TrustCachedPositive,
    /// Always read the remote record and rewrite the hint from it.
    ConfirmWithRemote,
}

/// Shared HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_page() -> u32 {
    DEFAULT_EVENTS_PAGE
}

fn default_messaging_url() -> String {
    "https://fcm.googleapis.com/v1/projects/eventide".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for EventsApiConfig {
    fn default() -> Self {
        Self {
            base_url: format!("https://{EVENTS_API_HOST}"),
            host: EVENTS_API_HOST.to_string(),
            api_key: None,
            default_city: DEFAULT_CITY.to_string(),
            default_state: DEFAULT_STATE.to_string(),
            page: DEFAULT_EVENTS_PAGE,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            auth_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            documents_url: "http://localhost:8080/v1/documents".to_string(),
            functions_url: "http://localhost:5001/functions".to_string(),
            messaging_url: default_messaging_url(),
            api_key: None,
            messaging_token: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: "eventide-cache.db".to_string(),
            pool_size: 4,
            rsvp_policy: RsvpCachePolicy::default(),
            clear_favorites_on_sign_out: true,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: HTTP_TIMEOUT_SECS, user_agent: None }
    }
}
