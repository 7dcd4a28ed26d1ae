//! On-device key-value cache backed by SQLite

pub mod sqlite;

pub use sqlite::SqliteKeyValueCache;
