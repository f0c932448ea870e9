//! Process-local cache store

use crate::model::StorageError;
use crate::storage::traits::CacheStore;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::info;

/// In-memory store. Contents are lost on restart; `None` once closed.
pub struct MemoryCache {
    entries: RwLock<Option<HashMap<String, String>>>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Some(HashMap::new())),
        }
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        entries.as_ref().map(HashMap::len).ok_or(StorageError::Closed)
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        let entries = entries.as_ref().ok_or(StorageError::Closed)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        let entries = entries.as_mut().ok_or(StorageError::Closed)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        if entries.take().is_some() {
            info!("In-memory cache store closed");
        }
        Ok(())
    }
}
