//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required keys are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `EVENTIDE_EVENTS_API_KEY`: Event listing API key
//! - `EVENTIDE_BACKEND_API_KEY`: Managed backend web API key
//!
//! Optional (defaults from [`Config::default`]):
//! - `EVENTIDE_EVENTS_API_URL`, `EVENTIDE_EVENTS_API_HOST`
//! - `EVENTIDE_DEFAULT_CITY`, `EVENTIDE_DEFAULT_STATE`
//! - `EVENTIDE_AUTH_URL`, `EVENTIDE_DOCUMENTS_URL`, `EVENTIDE_FUNCTIONS_URL`
//! - `EVENTIDE_MESSAGING_URL`, `EVENTIDE_MESSAGING_TOKEN`
//! - `EVENTIDE_CACHE_PATH`, `EVENTIDE_CACHE_POOL_SIZE`
//! - `EVENTIDE_RSVP_POLICY`: `trust_cached_positive` or `confirm_with_remote`
//! - `EVENTIDE_CLEAR_FAVORITES_ON_SIGN_OUT`: true/false
//! - `EVENTIDE_HTTP_TIMEOUT`: request timeout in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./eventide.json` or `./eventide.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location
//!
//! Keys present in the environment are layered over a file-loaded config by
//! [`apply_secrets_from_env`]. Keys are never written back out.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use eventide_domain::{Config, EventideError, Result, RsvpCachePolicy};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file and
/// overlays whatever secrets the environment does provide.
///
/// # Errors
/// Returns `EventideError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            let mut config = load_from_file(None)?;
            apply_secrets_from_env(&mut config);
            Ok(config)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `EventideError::Config` if required variables are missing
/// or optional ones have invalid values.
pub fn load_from_env() -> Result<Config> {
    let events_api_key = env_var("EVENTIDE_EVENTS_API_KEY")?;
    let backend_api_key = env_var("EVENTIDE_BACKEND_API_KEY")?;

    let mut config = Config::default();
    config.events_api.api_key = Some(events_api_key);
    config.backend.api_key = Some(backend_api_key);

    override_string("EVENTIDE_EVENTS_API_URL", &mut config.events_api.base_url);
    override_string("EVENTIDE_EVENTS_API_HOST", &mut config.events_api.host);
    override_string("EVENTIDE_DEFAULT_CITY", &mut config.events_api.default_city);
    override_string("EVENTIDE_DEFAULT_STATE", &mut config.events_api.default_state);

    override_string("EVENTIDE_AUTH_URL", &mut config.backend.auth_url);
    override_string("EVENTIDE_DOCUMENTS_URL", &mut config.backend.documents_url);
    override_string("EVENTIDE_FUNCTIONS_URL", &mut config.backend.functions_url);
    override_string("EVENTIDE_MESSAGING_URL", &mut config.backend.messaging_url);
    config.backend.messaging_token = optional_env("EVENTIDE_MESSAGING_TOKEN");

    override_string("EVENTIDE_CACHE_PATH", &mut config.cache.path);
    if let Some(size) = env_parse::<u32>("EVENTIDE_CACHE_POOL_SIZE", "cache pool size")? {
        config.cache.pool_size = size;
    }
    if let Some(policy) = optional_env("EVENTIDE_RSVP_POLICY") {
        config.cache.rsvp_policy = parse_policy(&policy)?;
    }
    config.cache.clear_favorites_on_sign_out =
        env_bool("EVENTIDE_CLEAR_FAVORITES_ON_SIGN_OUT", config.cache.clear_favorites_on_sign_out);

    if let Some(timeout) = env_parse::<u64>("EVENTIDE_HTTP_TIMEOUT", "HTTP timeout")? {
        config.http.timeout_seconds = timeout;
    }

    Ok(config)
}

/// Overlay API keys and the messaging credential from the environment onto
/// a file-loaded configuration.
pub fn apply_secrets_from_env(config: &mut Config) {
    if let Some(key) = optional_env("EVENTIDE_EVENTS_API_KEY") {
        config.events_api.api_key = Some(key);
    }
    if let Some(key) = optional_env("EVENTIDE_BACKEND_API_KEY") {
        config.backend.api_key = Some(key);
    }
    if let Some(token) = optional_env("EVENTIDE_MESSAGING_TOKEN") {
        config.backend.messaging_token = Some(token);
    }
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `EventideError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EventideError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EventideError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EventideError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| EventideError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EventideError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(EventideError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("eventide.json"),
        dir.join("eventide.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
    ]
}

fn parse_policy(raw: &str) -> Result<RsvpCachePolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trust_cached_positive" => Ok(RsvpCachePolicy::TrustCachedPositive),
        "confirm_with_remote" => Ok(RsvpCachePolicy::ConfirmWithRemote),
        other => Err(EventideError::Config(format!("Invalid RSVP policy: {other}"))),
    }
}

/// Get required environment variable
///
/// # Errors
/// Returns `EventideError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    optional_env(key).ok_or_else(|| {
        EventideError::Config(format!("Missing required environment variable: {key}"))
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn override_string(key: &str, target: &mut String) {
    if let Some(value) = optional_env(key) {
        *target = value;
    }
}

fn env_parse<T>(key: &str, label: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| EventideError::Config(format!("Invalid {label}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: &[&str] = &[
        "EVENTIDE_EVENTS_API_KEY",
        "EVENTIDE_BACKEND_API_KEY",
        "EVENTIDE_EVENTS_API_URL",
        "EVENTIDE_DEFAULT_CITY",
        "EVENTIDE_DOCUMENTS_URL",
        "EVENTIDE_MESSAGING_TOKEN",
        "EVENTIDE_CACHE_PATH",
        "EVENTIDE_CACHE_POOL_SIZE",
        "EVENTIDE_RSVP_POLICY",
        "EVENTIDE_CLEAR_FAVORITES_ON_SIGN_OUT",
        "EVENTIDE_HTTP_TIMEOUT",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for (value, expected) in [("1", true), ("TRUE", true), ("on", true), ("no", false)] {
            std::env::set_var("EVENTIDE_TEST_BOOL", value);
            assert_eq!(env_bool("EVENTIDE_TEST_BOOL", !expected), expected, "value {value}");
        }

        std::env::remove_var("EVENTIDE_TEST_BOOL");
        assert!(env_bool("EVENTIDE_TEST_BOOL", true));
        assert!(!env_bool("EVENTIDE_TEST_BOOL", false));
    }

    #[test]
    fn test_load_from_env_required_only() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("EVENTIDE_EVENTS_API_KEY", "rapid-key");
        std::env::set_var("EVENTIDE_BACKEND_API_KEY", "web-key");

        let config = load_from_env().expect("required vars are set");
        assert_eq!(config.events_api.api_key.as_deref(), Some("rapid-key"));
        assert_eq!(config.backend.api_key.as_deref(), Some("web-key"));
        assert_eq!(config.events_api.default_city, "Atlanta");
        assert_eq!(config.cache.rsvp_policy, RsvpCachePolicy::TrustCachedPositive);
        assert!(config.backend.messaging_token.is_none());

        clear_env();
    }

    #[test]
    fn test_load_from_env_overrides() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("EVENTIDE_EVENTS_API_KEY", "rapid-key");
        std::env::set_var("EVENTIDE_BACKEND_API_KEY", "web-key");
        std::env::set_var("EVENTIDE_DEFAULT_CITY", "Savannah");
        std::env::set_var("EVENTIDE_DOCUMENTS_URL", "http://localhost:9000/docs");
        std::env::set_var("EVENTIDE_CACHE_POOL_SIZE", "2");
        std::env::set_var("EVENTIDE_RSVP_POLICY", "confirm_with_remote");
        std::env::set_var("EVENTIDE_CLEAR_FAVORITES_ON_SIGN_OUT", "false");
        std::env::set_var("EVENTIDE_HTTP_TIMEOUT", "5");

        let config = load_from_env().expect("valid overrides");
        assert_eq!(config.events_api.default_city, "Savannah");
        assert_eq!(config.backend.documents_url, "http://localhost:9000/docs");
        assert_eq!(config.cache.pool_size, 2);
        assert_eq!(config.cache.rsvp_policy, RsvpCachePolicy::ConfirmWithRemote);
        assert!(!config.cache.clear_favorites_on_sign_out);
        assert_eq!(config.http.timeout_seconds, 5);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("EVENTIDE_EVENTS_API_KEY", "rapid-key");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, EventideError::Config(ref msg) if msg.contains("EVENTIDE_BACKEND_API_KEY")));

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("EVENTIDE_EVENTS_API_KEY", "rapid-key");
        std::env::set_var("EVENTIDE_BACKEND_API_KEY", "web-key");

        std::env::set_var("EVENTIDE_CACHE_POOL_SIZE", "not-a-number");
        assert!(matches!(load_from_env(), Err(EventideError::Config(_))));
        std::env::remove_var("EVENTIDE_CACHE_POOL_SIZE");

        std::env::set_var("EVENTIDE_RSVP_POLICY", "sometimes");
        assert!(matches!(load_from_env(), Err(EventideError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_secrets_overlay_file_config() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("EVENTIDE_MESSAGING_TOKEN", "server-cred");

        let mut config = Config::default();
        apply_secrets_from_env(&mut config);
        assert_eq!(config.backend.messaging_token.as_deref(), Some("server-cred"));
        assert!(config.events_api.api_key.is_none());

        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[events_api]
default_city = "Macon"

[cache]
path = "/tmp/eventide-test.db"
pool_size = 3
rsvp_policy = "confirm_with_remote"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("valid TOML");
        assert_eq!(config.events_api.default_city, "Macon");
        assert_eq!(config.events_api.default_state, "GA");
        assert_eq!(config.cache.pool_size, 3);
        assert_eq!(config.cache.rsvp_policy, RsvpCachePolicy::ConfirmWithRemote);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/config.json"))).unwrap_err();
        assert!(matches!(err, EventideError::Config(_)));
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "this is": "not valid json" "#, Path::new("test.json"));
        assert!(matches!(result, Err(EventideError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
