//! Durable client-side key/value storage.
//!
//! The storefront keeps two things across runs: the guest cart and the auth
//! token. Both are plain values under well-known keys (see
//! [`crate::models::session::keys`]).
//!
//! Implementations are synchronous so that a guest cart mutation and its
//! persistence can happen under the same cart lock.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lock poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A string key/value store that survives restarts.
pub trait LocalStorage: Send + Sync {
    /// Read a value; `None` when the key was never set or has been removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and deserialize a JSON value.
///
/// # Errors
///
/// Returns an error if the read fails or the stored text is not valid JSON
/// for `T`.
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn LocalStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    storage
        .get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

/// Serialize and store a JSON value.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn LocalStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::CartLineItem;
    use goshen_core::ProductId;
    use rust_decimal::Decimal;

    #[test]
    fn test_json_helpers_round_trip_cart_lines() {
        let storage = MemoryStorage::new();
        let lines = vec![
            CartLineItem::new(ProductId::new("p1"), 2, Decimal::new(5, 0)),
            CartLineItem::new(ProductId::new("p2"), 1, Decimal::new(349, 2)),
        ];

        write_json(&storage, "guestCart", &lines).unwrap();
        let loaded: Vec<CartLineItem> = read_json(&storage, "guestCart").unwrap().unwrap();
        assert_eq!(loaded, lines);
    }

    #[test]
    fn test_read_json_missing_key_is_none() {
        let storage = MemoryStorage::new();
        let loaded: Option<Vec<CartLineItem>> = read_json(&storage, "guestCart").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_json_reports_corrupt_values() {
        let storage = MemoryStorage::new();
        storage.set("guestCart", "{not json").unwrap();
        let result: Result<Option<Vec<CartLineItem>>, _> = read_json(&storage, "guestCart");
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
