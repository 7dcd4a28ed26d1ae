//! Persistent key-value cache port.
//!
//! Models the on-device store that survives process restarts. Values are
//! either booleans (RSVP hints) or strings (serialized favorites, session
//! blobs, push tokens). Nothing read from this port is authoritative.

use async_trait::async_trait;
use eventide_domain::Result;

/// Port for the on-device key-value cache.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Read a boolean flag. `None` if the key is absent or holds a string.
    async fn get_bool(&self, key: &str) -> Result<Option<bool>>;

    /// Write a boolean flag, replacing any previous value.
    async fn set_bool(&self, key: &str, value: bool) -> Result<()>;

    /// Read a string value. `None` if the key is absent or holds a boolean.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Write a string value, replacing any previous value.
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
