use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::core::error::StorageError;
use crate::core::ledger::{session_key, Ledger};
use crate::core::session::SessionRecord;

use super::decode_entry;

/// In-process ledger. Entries are kept serialized so reads go through the
/// same decode path as the SQLite backend.
#[derive(Default)]
pub struct MemoryLedger {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw value under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn append(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let value =
            serde_json::to_string(record).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.lock().insert(session_key(&record.session_id), value);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<SessionRecord>, StorageError> {
        Ok(self
            .lock()
            .iter()
            .filter_map(|(key, value)| decode_entry(key, value))
            .collect())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.lock().clear();
        Ok(())
    }
}
