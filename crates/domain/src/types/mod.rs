//! Domain types and models

pub mod chat;
pub mod document;
pub mod event;
pub mod favorites;
pub mod user;

pub use chat::{ChatMessage, EventDraft};
pub use document::{Document, DocumentPath, FieldValue, Fields, OrderBy, SortDirection};
pub use event::{parse_coordinate, Attendee, Countdown, EventCategory, EventSummary, RsvpState};
pub use favorites::FavoriteSet;
pub use user::{AuthUser, Session, UserProfile, UserRole};
