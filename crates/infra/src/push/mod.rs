//! Push notification adapters
//!
//! - [`CallableFavoriteNotifier`]: client for the hosted `notifyOnFavorite`
//!   callable function
//! - [`FcmPushGateway`]: server side delivery through the messaging API

pub mod callable;
pub mod fcm;

pub use callable::CallableFavoriteNotifier;
pub use fcm::FcmPushGateway;
