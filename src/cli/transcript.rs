use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::core::error::CompanionError;
use crate::core::message::ChatMessage;
use crate::core::session::new_session_id;

/// A finished conversation exported by the chat front-end.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn load(path: &Path) -> Result<Self, CompanionError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompanionError::Transcript(format!("{}: {e}", path.display())))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CompanionError> {
        serde_json::from_str(content).map_err(|e| CompanionError::Transcript(e.to_string()))
    }

    /// Explicit start time, else the earliest message timestamp.
    pub fn resolved_start(&self) -> Result<DateTime<Utc>, CompanionError> {
        self.start_time
            .or_else(|| self.messages.iter().filter_map(|m| m.timestamp).min())
            .ok_or_else(|| {
                CompanionError::Transcript("no startTime and no timestamped messages".into())
            })
    }

    /// Explicit end time, else the latest message timestamp, if any.
    pub fn resolved_end(&self) -> Option<DateTime<Utc>> {
        self.end_time
            .or_else(|| self.messages.iter().filter_map(|m| m.timestamp).max())
    }

    pub fn resolved_id(&self, start: DateTime<Utc>) -> String {
        self.session_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| new_session_id(start))
    }
}
