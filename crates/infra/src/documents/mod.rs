//! Managed document database client

mod codec;
pub mod rest;

pub use rest::RestDocumentStore;
