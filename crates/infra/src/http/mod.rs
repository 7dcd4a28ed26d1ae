//! Shared HTTP transport

pub mod client;

pub use client::{ensure_success, HttpClient, HttpClientBuilder};
