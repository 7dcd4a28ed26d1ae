//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Event listing source
pub const EVENTS_API_HOST: &str = "eventbrite-api4.p.rapidapi.com";
pub const DEFAULT_CITY: &str = "Atlanta";
pub const DEFAULT_STATE: &str = "GA";
pub const DEFAULT_EVENTS_PAGE: u32 = 1;
pub const NEARBY_EVENTS_LIMIT: usize = 2;

// HTTP
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Key-value cache keys
pub const FAVORITES_CACHE_KEY: &str = "favorites";
pub const RSVP_CACHE_PREFIX: &str = "rsvp:";
pub const SESSION_CACHE_KEY: &str = "auth:session";
pub const PUSH_TOKEN_CACHE_KEY: &str = "push:token";

// Remote collections
pub const EVENTS_COLLECTION: &str = "events";
pub const ATTENDEES_COLLECTION: &str = "attendees";
pub const CHAT_COLLECTION: &str = "chat";
pub const USERS_COLLECTION: &str = "users";

// User-facing fallbacks
pub const ANONYMOUS_SENDER: &str = "Anonymous";
pub const GOOGLE_PROVIDER_ID: &str = "google.com";

/// Cache key for one user's RSVP hint on a single event.
pub fn rsvp_cache_key(uid: &str, event_id: &str) -> String {
    format!("{RSVP_CACHE_PREFIX}{uid}:{event_id}")
}
