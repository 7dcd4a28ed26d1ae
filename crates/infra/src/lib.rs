//! # Eventide Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite key-value cache
//! - HTTP clients for the listing API, identity service, document store,
//!   callable functions and push messaging
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `eventide-core`
//! - Depends on `eventide-domain` and `eventide-core`
//! - Contains all "impure" code (I/O, network, files)

pub mod auth;
pub mod cache;
pub mod config;
pub mod documents;
pub mod errors;
pub mod events_api;
pub mod http;
pub mod push;

// Re-export commonly used items
pub use auth::{AccessTokenProvider, RestAuthProvider, StaticAccessToken};
pub use cache::SqliteKeyValueCache;
pub use documents::RestDocumentStore;
pub use errors::{ApiError, InfraError};
pub use events_api::client::RapidApiEventSource;
pub use http::HttpClient;
pub use push::{CallableFavoriteNotifier, FcmPushGateway};
