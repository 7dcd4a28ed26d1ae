//! Push notifications: the favorited-event function and device token
//! registration

pub mod ports;
pub mod registration;
pub mod service;

pub use ports::{FavoriteNotifier, PushGateway, PushMessage};
pub use registration::PushRegistration;
pub use service::{notify_on_favorite, NotifyRequest, NotifyResponse};
