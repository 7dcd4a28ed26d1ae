//! # Eventide Core
//!
//! Business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the managed backend services
//! - The services built on them: favorites, RSVPs, event feed, auth, chat
//!   and push notifications
//!
//! ## Architecture Principles
//! - Only depends on `eventide-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits held as `Arc<dyn Port>`

pub mod auth;
pub mod chat;
pub mod events;
pub mod favorites;
pub mod notifications;
pub mod rsvp;
pub mod utils;

// Infrastructure ports
pub mod cache_ports;
pub mod document_ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{AuthProvider, AuthService};
pub use cache_ports::KeyValueCache;
pub use chat::ChatService;
pub use document_ports::DocumentStore;
pub use events::{AdminEventService, EventFeed, EventSource};
pub use favorites::FavoritesStore;
pub use notifications::{
    notify_on_favorite, FavoriteNotifier, NotifyRequest, NotifyResponse, PushGateway,
    PushMessage, PushRegistration,
};
pub use rsvp::RsvpService;
