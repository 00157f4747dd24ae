use async_trait::async_trait;

use crate::core::error::StorageError;
use crate::core::session::SessionRecord;

/// Key prefix shared by every ledger backend.
pub const SESSION_KEY_PREFIX: &str = "session:";

pub fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}

/// Store of completed sessions, keyed by session id.
///
/// One writer (the session that just ended) and one reader (the dashboard)
/// are expected; neither runs concurrently with the other.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Stores `record`, replacing any previous record with the same id.
    async fn append(&self, record: &SessionRecord) -> Result<(), StorageError>;

    /// Every readable record, in no particular order. Entries that fail to
    /// deserialize are skipped.
    async fn read_all(&self) -> Result<Vec<SessionRecord>, StorageError>;

    /// Drops every stored record.
    async fn clear(&self) -> Result<(), StorageError>;
}
