use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;

/// One text value per key. Collections are stored whole in a single slot.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Durable slots in the `kv_slots` table of the local SQLite database.
#[derive(Clone)]
pub struct SqliteKv {
    pool: SqlitePool,
}

impl SqliteKv {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKv {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(r#"SELECT value FROM kv_slots WHERE key = ?1"#)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("read slot {}", key))?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_slots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(OffsetDateTime::now_utc())
        .execute(&self.pool)
        .await
        .with_context(|| format!("write slot {}", key))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM kv_slots WHERE key = ?1"#)
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("remove slot {}", key))?;
        Ok(())
    }
}

/// Process-local slots, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryKv {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| anyhow::anyhow!("memory kv lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod storage_tests {
    use super::*;

    async fn exercise(kv: &dyn KeyValueStore) {
        assert_eq!(kv.get("a").await.unwrap(), None);

        kv.put("a", "[1]").await.unwrap();
        kv.put("b", "[2]").await.unwrap();
        assert_eq!(kv.get("a").await.unwrap().as_deref(), Some("[1]"));

        kv.put("a", "[3]").await.unwrap();
        assert_eq!(kv.get("a").await.unwrap().as_deref(), Some("[3]"));

        kv.remove("a").await.unwrap();
        kv.remove("a").await.unwrap();
        assert_eq!(kv.get("a").await.unwrap(), None);
        assert_eq!(kv.get("b").await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn memory_kv_slots() {
        exercise(&MemoryKv::new()).await;
    }

    #[tokio::test]
    async fn sqlite_kv_slots() {
        let pool = crate::db::connect_url("sqlite::memory:", 5).await.unwrap();
        exercise(&SqliteKv::new(pool)).await;
    }
}
