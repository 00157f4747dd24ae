use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::emotion::{Emotion, EmotionCounts};

const SESSION_ID_SUFFIX_LEN: usize = 7;

/// One completed session as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub emotion_counts: EmotionCounts,
}

impl SessionRecord {
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Whole minutes, rounded to nearest; zero when the session never ended.
    pub fn duration_minutes(&self) -> i64 {
        self.duration()
            .map(|d| (d.num_milliseconds() as f64 / 60_000.0).round() as i64)
            .unwrap_or(0)
    }

    pub fn primary_emotion(&self) -> Emotion {
        primary_emotion(&self.emotion_counts)
    }
}

/// Most frequent label. Ties go to the label declared first; an all-zero
/// histogram yields `Neutral`.
pub fn primary_emotion(counts: &EmotionCounts) -> Emotion {
    let mut best = (Emotion::Neutral, 0u64);
    for (emotion, count) in counts.iter() {
        if count > best.1 {
            best = (emotion, count);
        }
    }
    best.0
}

/// `session_<unix millis>_<7 lowercase alphanumerics>`
pub fn new_session_id(now: DateTime<Utc>) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SESSION_ID_SUFFIX_LEN)
        .collect();
    format!("session_{}_{}", now.timestamp_millis(), suffix)
}
