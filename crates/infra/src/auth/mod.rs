//! Managed authentication service client

pub mod rest;
pub mod token;

pub use rest::RestAuthProvider;
pub use token::{AccessTokenProvider, StaticAccessToken};
