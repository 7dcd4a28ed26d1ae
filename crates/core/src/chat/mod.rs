//! Per-event chat rooms

pub mod service;

pub use service::ChatService;
