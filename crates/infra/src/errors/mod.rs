//! Infrastructure error types and conversions into `EventideError`

pub mod api;
pub mod conversions;

pub use api::ApiError;
pub use conversions::InfraError;
