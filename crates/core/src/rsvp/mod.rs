//! Event attendance (RSVP) state

pub mod service;

pub use service::RsvpService;
