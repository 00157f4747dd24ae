use chrono::{DateTime, Utc};

use crate::analytics::SessionRecorder;
use crate::core::emotion::Emotion;
use crate::core::message::ChatMessage;
use crate::core::reply::ReplyService;
use crate::core::session::{new_session_id, SessionRecord};

use super::sampler::SamplerHandle;

pub const GREETING: &str = "Hello! I'm your AI therapist. How are you feeling today?";

/// A session in progress: the transcript so far plus the emotion feed.
pub struct LiveSession {
    id: String,
    start_time: DateTime<Utc>,
    messages: Vec<ChatMessage>,
    sampler: Option<SamplerHandle>,
    /// Last label the reply service reported. Only consulted when no sampler
    /// is attached; otherwise replies publish into the sampler's slot.
    reported: Option<Emotion>,
}

impl LiveSession {
    pub fn start() -> Self {
        let start_time = Utc::now();
        let id = new_session_id(start_time);
        tracing::info!(session_id = %id, "session started");
        Self {
            id,
            start_time,
            messages: vec![ChatMessage::ai(GREETING, None)],
            sampler: None,
            reported: None,
        }
    }

    pub fn with_sampler(mut self, sampler: SamplerHandle) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Newest label from either the camera sampler or the reply service.
    pub fn current_emotion(&self) -> Option<Emotion> {
        match &self.sampler {
            Some(sampler) => sampler.latest(),
            None => self.reported,
        }
    }

    /// Appends a system notice, e.g. when the camera cannot be opened.
    pub fn notice(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::notice(text));
    }

    /// Sends one user message and appends the reply. Blank input is ignored.
    /// A failed reply becomes an apology message rather than an error.
    pub async fn send(&mut self, replies: &dyn ReplyService, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(text));

        match replies.reply(text, self.current_emotion()).await {
            Ok(reply) => {
                if let Some(emotion) = reply.detected_emotion {
                    match &self.sampler {
                        Some(sampler) => sampler.publish(emotion),
                        None => self.reported = Some(emotion),
                    }
                }
                self.messages
                    .push(ChatMessage::ai(reply.response, reply.detected_emotion));
            }
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "reply failed");
                self.messages.push(ChatMessage::notice(format!(
                    "Sorry, I encountered an issue. Please try again. Error: {e}"
                )));
            }
        }
        self.messages.last()
    }

    /// Stops the emotion feed and files the session.
    pub async fn finish(self, recorder: &SessionRecorder) -> SessionRecord {
        self.finish_at(recorder, Utc::now()).await
    }

    pub async fn finish_at(self, recorder: &SessionRecorder, end_time: DateTime<Utc>) -> SessionRecord {
        if let Some(sampler) = self.sampler {
            sampler.stop().await;
        }
        let record = recorder
            .record(&self.id, &self.messages, self.start_time, Some(end_time))
            .await;
        tracing::info!(
            session_id = %record.session_id,
            messages = record.message_count,
            "session ended"
        );
        record
    }
}
