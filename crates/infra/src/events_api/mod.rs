//! Third-party event listing API

pub mod client;
mod mapping;

pub use client::RapidApiEventSource;
