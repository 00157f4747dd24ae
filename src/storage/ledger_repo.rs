use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::StorageError;
use crate::core::ledger::{session_key, Ledger, SESSION_KEY_PREFIX};
use crate::core::session::SessionRecord;

use super::decode_entry;

/// Ledger backed by the `ledger_entries` key/value table.
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn append(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let value =
            serde_json::to_string(record).map_err(|e| StorageError::Serialization(e.to_string()))?;

        sqlx::query(
            "INSERT INTO ledger_entries (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
             updated_at = excluded.updated_at",
        )
        .bind(session_key(&record.session_id))
        .bind(&value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        tracing::debug!(session_id = %record.session_id, "session recorded");
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<SessionRecord>, StorageError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT key, value FROM ledger_entries WHERE key LIKE ? ORDER BY key ASC",
        )
        .bind(format!("{SESSION_KEY_PREFIX}%"))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .filter_map(|(key, value)| decode_entry(key, value))
            .collect())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM ledger_entries WHERE key LIKE ?")
            .bind(format!("{SESSION_KEY_PREFIX}%"))
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }
}
