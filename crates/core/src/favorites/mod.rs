//! Favorites state shared across screens

pub mod store;

pub use store::FavoritesStore;
