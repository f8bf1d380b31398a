//! Outbound ports: the key-value store behind scores and mood entries.

use async_trait::async_trait;
use serde_json::Value;

/// Key-value store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Backend could not be reached or failed the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Operation does not apply to the value held at the key
    #[error("wrong value type at key {0}")]
    WrongType(String),
}

/// Minimal managed key-value store interface.
///
/// Plain keys hold JSON values; set keys hold unordered string members.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Fetch several keys at once. The result has one slot per key.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Value>>, StorageError>;

    /// Add a member to a set. Returns `true` if it was not already present.
    async fn sadd(&self, key: &str, member: &str) -> Result<bool, StorageError>;

    async fn smembers(&self, key: &str) -> Result<Vec<String>, StorageError>;
}
