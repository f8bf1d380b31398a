//! In-process [`KvStore`] backed by a concurrent map.

use crate::ports::outbound::{KvStore, StorageError};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Entry {
    Value(Value),
    Set(BTreeSet<String>),
}

/// In-memory key-value store.
///
/// `set` overwrites whatever the key held; reading a set key with `get`
/// (or adding to a plain key with `sadd`) is a [`StorageError::WrongType`].
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: DashMap<String, Entry>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match self.entries.get(key).as_deref() {
            None => Ok(None),
            Some(Entry::Value(v)) => Ok(Some(v.clone())),
            Some(Entry::Set(_)) => Err(StorageError::WrongType(key.to_string())),
        }
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.read(key)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), Entry::Value(value));
        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<Value>>, StorageError> {
        keys.iter().map(|k| self.read(k)).collect()
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<bool, StorageError> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()));
        match entry.value_mut() {
            Entry::Set(members) => Ok(members.insert(member.to_string())),
            Entry::Value(_) => Err(StorageError::WrongType(key.to_string())),
        }
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, StorageError> {
        match self.entries.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Entry::Set(members)) => Ok(members.iter().cloned().collect()),
            Some(Entry::Value(_)) => Err(StorageError::WrongType(key.to_string())),
        }
    }
}
