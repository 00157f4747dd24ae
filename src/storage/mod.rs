mod database;
mod ledger_repo;
mod memory;


pub use database::Database;
pub use ledger_repo::SqliteLedger;
pub use memory::MemoryLedger;

use crate::core::ledger::SESSION_KEY_PREFIX;
use crate::core::session::SessionRecord;

fn decode_entry(key: &str, value: &str) -> Option<SessionRecord> {
    if !key.starts_with(SESSION_KEY_PREFIX) {
        return None;
    }
    match serde_json::from_str::<SessionRecord>(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!(key, error = %e, "skipping unreadable ledger entry");
            None
        }
    }
}
