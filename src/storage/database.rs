use crate::core::config::AppConfig;
use crate::core::error::StorageError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

const DB_FILE: &str = "companion.db";

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn open(config: &AppConfig) -> Result<Self, StorageError> {
        let db_dir = config.data_path();
        std::fs::create_dir_all(&db_dir).map_err(|e| StorageError::Database(e.to_string()))?;

        let db_path = db_dir.join(DB_FILE);
        tracing::debug!(path = %db_path.display(), "opening ledger database");
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database; contents vanish with the pool.
    /// The connection is never recycled, since that would drop the data.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::query(include_str!("../../migrations/001_initial.sql"))
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        Ok(())
    }

    pub fn ledger(&self) -> super::SqliteLedger {
        super::SqliteLedger::new(self.pool.clone())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
