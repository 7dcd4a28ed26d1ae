//! Shared helpers for core services

pub mod fields;
pub mod paths;

pub use fields::fields;
