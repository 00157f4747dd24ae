use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::emotion::Emotion;
use crate::core::error::ReplyError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub response: String,
    pub detected_emotion: Option<Emotion>,
}

/// Produces the companion's answer to one user message.
#[async_trait]
pub trait ReplyService: Send + Sync {
    async fn reply(
        &self,
        message: &str,
        current_emotion: Option<Emotion>,
    ) -> Result<Reply, ReplyError>;
}
