use async_trait::async_trait;

use crate::core::emotion::Emotion;
use crate::core::error::DetectionError;

/// Classifies the user's current expression, e.g. from a camera frame.
#[async_trait]
pub trait EmotionDetector: Send + Sync {
    /// One label from the closed set, or `None` when no face/expression was
    /// recognised.
    async fn detect(&self) -> Result<Option<Emotion>, DetectionError>;
}
