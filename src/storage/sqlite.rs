use crate::model::StorageError;
use crate::storage::traits::CacheStore;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::info;

pub struct SqliteCache {
    conn: Mutex<Option<Connection>>,
}

impl SqliteCache {
    /// Открывает соединение к БД и создаёт таблицу кэша при необходимости
    pub fn open(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Self::migrate(&conn)?;
        info!("Cache store opened at {}", db_path);
        Ok(Self { conn: Mutex::new(Some(conn)) })
    }

    /// Кэш в памяти процесса, без файла
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::migrate(&conn)?;
        Ok(Self { conn: Mutex::new(Some(conn)) })
    }

    fn migrate(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "
        )?;
        Ok(())
    }

    /// Количество записей в кэше
    pub async fn len(&self) -> Result<usize, StorageError> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(StorageError::Closed)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait::async_trait]
impl CacheStore for SqliteCache {
    /// Возвращает сохранённое значение по ключу, если оно есть
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(StorageError::Closed)?;

        let value = conn
            .query_row("SELECT value FROM cache WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Сохраняет (вставляет или перезаписывает) значение без срока жизни
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(StorageError::Closed)?;

        conn.execute(
            "INSERT OR REPLACE INTO cache (key, value, created_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| StorageError::Database(e))?;
            info!("Cache store closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = SqliteCache::open_in_memory().unwrap();
        assert_eq!(store.get("drom:toyota:corolla:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_and_overwrite() {
        let store = SqliteCache::open_in_memory().unwrap();
        store.set("k", "[]").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[]"));

        store.set("k", r#"[{"a":1}]"#).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(r#"[{"a":1}]"#));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        let path = path.to_str().unwrap();

        let store = SqliteCache::open(path).unwrap();
        store.set("drom:toyota:corolla:1", "[]").await.unwrap();
        store.close().await.unwrap();

        let reopened = SqliteCache::open(path).unwrap();
        assert_eq!(
            reopened.get("drom:toyota:corolla:1").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn closed_store_rejects_calls() {
        let store = SqliteCache::open_in_memory().unwrap();
        store.close().await.unwrap();
        // second close is a no-op
        store.close().await.unwrap();

        assert!(matches!(store.get("k").await, Err(StorageError::Closed)));
        assert!(matches!(store.set("k", "v").await, Err(StorageError::Closed)));
    }
}
