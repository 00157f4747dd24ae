use super::*;
use crate::analytics::SessionRecorder;
use crate::core::emotion::Emotion;
use crate::core::error::{DetectionError, ReplyError};
use crate::core::ledger::Ledger;
use crate::core::message::Sender;
use crate::core::reply::{Reply, ReplyService};
use crate::storage::MemoryLedger;
use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;

struct BrokenReplies;

#[async_trait]
impl ReplyService for BrokenReplies {
    async fn reply(&self, _message: &str, _emotion: Option<Emotion>) -> Result<Reply, ReplyError> {
        Err(ReplyError::Http("connection refused".into()))
    }
}

#[test]
fn test_parse_reply_ok() {
    let reply = parse_reply(200, r#"{"response":"I hear you.","detectedEmotion":"sad"}"#).unwrap();
    assert_eq!(reply.response, "I hear you.");
    assert_eq!(reply.detected_emotion, Some(Emotion::Sad));

    let reply = parse_reply(200, r#"{"response":"ok","detectedEmotion":null}"#).unwrap();
    assert_eq!(reply.detected_emotion, None);
}

#[test]
fn test_parse_reply_errors() {
    match parse_reply(500, r#"{"error":"model overloaded"}"#) {
        Err(ReplyError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "model overloaded");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }

    match parse_reply(502, "<html>bad gateway</html>") {
        Err(ReplyError::Api { message, .. }) => assert_eq!(message, "Failed to get AI response"),
        other => panic!("Expected Api error, got {other:?}"),
    }

    assert!(matches!(
        parse_reply(200, r#"{"text":"wrong shape"}"#),
        Err(ReplyError::Malformed(_))
    ));
}

#[test]
fn test_http_endpoint() {
    let mut config = crate::core::config::AppConfig::default();
    config.reply.base_url = "http://example.test/".into();
    let service = HttpReplyService::new(&config).unwrap();
    assert_eq!(service.endpoint(), "http://example.test/api/therapist");
}

#[tokio::test]
async fn test_canned_replies_cycle() {
    let canned = CannedReplyService::new(vec!["one".into(), "two".into()]);
    let a = canned.reply("x", None).await.unwrap();
    let b = canned.reply("x", Some(Emotion::Happy)).await.unwrap();
    let c = canned.reply("x", None).await.unwrap();
    assert_eq!(a.response, "one");
    assert_eq!(b.response, "two");
    assert_eq!(b.detected_emotion, Some(Emotion::Happy));
    assert_eq!(c.response, "one");
}

#[tokio::test]
async fn test_sampler_publishes_and_stops() {
    let handle = EmotionSampler::new(
        Arc::new(FixedDetector(Some(Emotion::Angry))),
        Duration::from_millis(10),
    )
    .spawn();
    assert_eq!(handle.latest(), None);

    let mut rx = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handle.latest(), Some(Emotion::Angry));

    tokio::time::timeout(Duration::from_secs(2), handle.stop())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sampler_keeps_last_label_on_error() {
    let detector = ScriptedDetector::new(vec![
        Ok(Some(Emotion::Happy)),
        Err(DetectionError::Classifier("no face".into())),
    ]);
    let handle = EmotionSampler::new(Arc::new(detector), Duration::from_millis(5)).spawn();

    let mut rx = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handle.latest(), Some(Emotion::Happy));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.latest(), Some(Emotion::Happy));
    handle.stop().await;
}

#[tokio::test]
async fn test_live_session_round_trip() {
    let ledger = Arc::new(MemoryLedger::new());
    let recorder = SessionRecorder::new(ledger.clone());
    let replies = CannedReplyService::default();

    let mut session = LiveSession::start();
    assert!(session.id().starts_with("session_"));
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].text, GREETING);

    assert!(session.send(&replies, "   ").await.is_none());

    // No emotion known yet: the canned reply echoes none back
    let reply = session.send(&replies, "I had a rough week").await.unwrap();
    assert_eq!(reply.sender, Sender::Ai);
    assert_eq!(reply.emotion, None);

    let start = session.start_time();
    let record = session
        .finish_at(&recorder, start + ChronoDuration::minutes(4))
        .await;
    assert_eq!(record.message_count, 3);
    assert!(record.emotion_counts.is_empty());
    assert_eq!(record.duration_minutes(), 4);

    let stored = ledger.read_all().await.unwrap();
    assert_eq!(stored, vec![record]);
}

#[tokio::test]
async fn test_live_session_uses_sampled_emotion() {
    let ledger = Arc::new(MemoryLedger::new());
    let recorder = SessionRecorder::new(ledger.clone());
    let replies = CannedReplyService::default();

    let handle = EmotionSampler::new(
        Arc::new(FixedDetector(Some(Emotion::Sad))),
        Duration::from_millis(5),
    )
    .spawn();
    let mut rx = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .unwrap()
        .unwrap();

    let mut session = LiveSession::start().with_sampler(handle);
    assert_eq!(session.current_emotion(), Some(Emotion::Sad));

    session.send(&replies, "hello").await;
    session.send(&replies, "still here").await;

    let record = session.finish(&recorder).await;
    assert_eq!(record.message_count, 5);
    assert_eq!(record.emotion_counts.get(Emotion::Sad), 2);
    assert_eq!(record.primary_emotion(), Emotion::Sad);
}

#[tokio::test]
async fn test_live_session_reply_failure_becomes_apology() {
    let recorder = SessionRecorder::new(Arc::new(MemoryLedger::new()));
    let mut session = LiveSession::start();

    let msg = session.send(&BrokenReplies, "hi").await.unwrap();
    assert_eq!(msg.sender, Sender::Ai);
    assert!(msg.timestamp.is_none());
    assert!(msg
        .text
        .starts_with("Sorry, I encountered an issue. Please try again. Error: "));
    assert!(msg.text.contains("connection refused"));

    session.notice("Unable to access camera.");
    let record = session.finish(&recorder).await;
    assert_eq!(record.message_count, 4);
}

struct SadReplies;

#[async_trait]
impl ReplyService for SadReplies {
    async fn reply(&self, _message: &str, _emotion: Option<Emotion>) -> Result<Reply, ReplyError> {
        Ok(Reply {
            response: "That sounds heavy.".into(),
            detected_emotion: Some(Emotion::Sad),
        })
    }
}

#[tokio::test]
async fn test_newest_emotion_wins_between_camera_and_reply() {
    let handle = EmotionSampler::new(
        Arc::new(FixedDetector(Some(Emotion::Happy))),
        Duration::from_millis(5),
    )
    .spawn();
    let mut rx = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .unwrap()
        .unwrap();

    let mut session = LiveSession::start().with_sampler(handle);
    assert_eq!(session.current_emotion(), Some(Emotion::Happy));

    let reply = session.send(&SadReplies, "not great").await.unwrap();
    assert_eq!(reply.emotion, Some(Emotion::Sad));

    // The next camera sample replaces the reply's label
    rx.borrow_and_update();
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.current_emotion(), Some(Emotion::Happy));

    session
        .finish(&SessionRecorder::new(Arc::new(MemoryLedger::new())))
        .await;
}

#[tokio::test]
async fn test_reply_label_kept_without_sampler() {
    let mut session = LiveSession::start();
    assert_eq!(session.current_emotion(), None);
    session.send(&SadReplies, "meh").await;
    assert_eq!(session.current_emotion(), Some(Emotion::Sad));
}

#[tokio::test]
async fn test_published_label_is_visible_to_subscribers() {
    let handle = EmotionSampler::new(Arc::new(FixedDetector(None)), Duration::from_secs(60)).spawn();
    let mut rx = handle.subscribe();
    handle.publish(Emotion::Fearful);
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Some(Emotion::Fearful));
    assert_eq!(handle.latest(), Some(Emotion::Fearful));
    handle.stop().await;
}
