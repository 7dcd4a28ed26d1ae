//! # Eventide Domain
//!
//! Business domain types and models for Eventide.
//!
//! This crate contains:
//! - Event, favorite, attendee, chat and user data types
//! - Remote document model (paths, field values, documents)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Eventide crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
