//! Event listings and admin-created events

pub mod admin;
pub mod feed;
pub mod ports;

pub use admin::AdminEventService;
pub use feed::EventFeed;
pub use ports::EventSource;
