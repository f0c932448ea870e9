use crate::model::StorageError;

/// Key-value store behind the fetcher cache. Values never expire.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Releases the underlying connection; later calls fail with `StorageError::Closed`.
    async fn close(&self) -> Result<(), StorageError>;
}
