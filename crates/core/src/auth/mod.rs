//! Authentication and user profiles

pub mod ports;
pub mod service;

pub use ports::AuthProvider;
pub use service::AuthService;
