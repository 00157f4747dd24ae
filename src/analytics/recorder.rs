use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::core::emotion::EmotionCounts;
use crate::core::ledger::Ledger;
use crate::core::message::ChatMessage;
use crate::core::session::SessionRecord;

/// Turns a finished conversation into a [`SessionRecord`] and files it.
#[derive(Clone)]
pub struct SessionRecorder {
    ledger: Arc<dyn Ledger>,
}

impl SessionRecorder {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Builds the record and appends it to the ledger.
    ///
    /// A failed write is logged and otherwise ignored; the record is returned
    /// either way.
    pub async fn record(
        &self,
        session_id: &str,
        messages: &[ChatMessage],
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> SessionRecord {
        let record = build_record(session_id, messages, start_time, end_time);
        if let Err(e) = self.ledger.append(&record).await {
            tracing::warn!(session_id, error = %e, "failed to save session; record dropped");
        }
        record
    }
}

/// Counts every message from both sides; only messages carrying a label
/// contribute to the histogram.
pub fn build_record(
    session_id: &str,
    messages: &[ChatMessage],
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
) -> SessionRecord {
    let emotion_counts: EmotionCounts = messages.iter().filter_map(|m| m.emotion).collect();

    SessionRecord {
        session_id: session_id.to_string(),
        start_time,
        end_time,
        message_count: messages.len() as u64,
        emotion_counts,
    }
}
