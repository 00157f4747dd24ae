use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::config::AppConfig;
use crate::core::emotion::{lenient_label, Emotion};
use crate::core::error::ReplyError;
use crate::core::reply::{Reply, ReplyService};

const REPLY_PATH: &str = "/api/therapist";
const GENERIC_FAILURE: &str = "Failed to get AI response";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    message: &'a str,
    current_emotion: Option<Emotion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody {
    response: String,
    #[serde(default, deserialize_with = "lenient_label")]
    detected_emotion: Option<Emotion>,
}

/// Talks to the chat endpoint of the web front-end.
pub struct HttpReplyService {
    client: Client,
    endpoint: String,
}

impl HttpReplyService {
    pub fn new(config: &AppConfig) -> Result<Self, ReplyError> {
        let client = Client::builder()
            .timeout(config.reply_timeout())
            .build()
            .map_err(|e| ReplyError::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", config.reply.base_url.trim_end_matches('/'), REPLY_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReplyService for HttpReplyService {
    async fn reply(
        &self,
        message: &str,
        current_emotion: Option<Emotion>,
    ) -> Result<Reply, ReplyError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&ReplyRequest {
                message,
                current_emotion,
            })
            .send()
            .await
            .map_err(|e| ReplyError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ReplyError::Http(e.to_string()))?;
        parse_reply(status, &body)
    }
}

/// Decodes the endpoint's JSON. Non-2xx responses carry their reason in an
/// `error` field.
pub fn parse_reply(status: u16, body: &str) -> Result<Reply, ReplyError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        return Err(ReplyError::Api { status, message });
    }

    let parsed: ReplyBody =
        serde_json::from_str(body).map_err(|e| ReplyError::Malformed(e.to_string()))?;
    Ok(Reply {
        response: parsed.response,
        detected_emotion: parsed.detected_emotion,
    })
}

/// Offline stand-in that cycles through fixed replies and echoes the current
/// emotion back as the detected one.
pub struct CannedReplyService {
    replies: Vec<String>,
    next: AtomicUsize,
}

impl CannedReplyService {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies,
            next: AtomicUsize::new(0),
        }
    }
}

impl Default for CannedReplyService {
    fn default() -> Self {
        Self::new(vec![
            "That sounds like a lot to carry. Want to tell me more?".into(),
            "It makes sense you'd feel that way.".into(),
            "Let's take it one step at a time.".into(),
        ])
    }
}

#[async_trait]
impl ReplyService for CannedReplyService {
    async fn reply(
        &self,
        _message: &str,
        current_emotion: Option<Emotion>,
    ) -> Result<Reply, ReplyError> {
        if self.replies.is_empty() {
            return Err(ReplyError::Malformed("no canned replies configured".into()));
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        Ok(Reply {
            response: self.replies[i].clone(),
            detected_emotion: current_emotion,
        })
    }
}
