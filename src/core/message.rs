use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::emotion::{lenient_label, Emotion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_label"
    )]
    pub emotion: Option<Emotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            emotion: None,
            timestamp: Some(Utc::now()),
        }
    }

    pub fn ai(text: impl Into<String>, emotion: Option<Emotion>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Ai,
            emotion,
            timestamp: Some(Utc::now()),
        }
    }

    /// AI-side notice with no timestamp, e.g. camera or reply failures.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Ai,
            emotion: None,
            timestamp: None,
        }
    }
}
