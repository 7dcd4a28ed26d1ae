pub mod account;
pub mod admin;
pub mod chat;
pub mod events;
pub mod favorites;
pub mod push;
pub mod rsvp;
