use super::output::{render_json, render_recorded, render_text};
use super::Transcript;
use crate::analytics::{build_record, Dashboard};
use crate::core::emotion::{Emotion, EmotionCounts};
use crate::core::session::SessionRecord;
use chrono::{Duration, TimeZone, Utc};

const TRANSCRIPT: &str = r#"{
    "sessionId": "session_1736500000000_k3j9x2a",
    "messages": [
        {"text": "Hello! How are you feeling today?", "sender": "ai", "timestamp": "2025-01-10T08:00:00Z"},
        {"text": "Pretty anxious", "sender": "user", "timestamp": "2025-01-10T08:01:00Z"},
        {"text": "That sounds hard.", "sender": "ai", "emotion": "fearful", "timestamp": "2025-01-10T08:02:00Z"},
        {"text": "Sorry, I encountered an issue.", "sender": "ai"},
        {"text": "Thanks", "sender": "user", "emotion": "grateful", "timestamp": "2025-01-10T08:09:30Z"}
    ]
}"#;

#[test]
fn test_transcript_resolution() {
    let t = Transcript::parse(TRANSCRIPT).unwrap();
    let start = t.resolved_start().unwrap();
    assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap());
    assert_eq!(
        t.resolved_end(),
        Some(Utc.with_ymd_and_hms(2025, 1, 10, 8, 9, 30).unwrap())
    );
    assert_eq!(t.resolved_id(start), "session_1736500000000_k3j9x2a");

    let record = build_record(&t.resolved_id(start), &t.messages, start, t.resolved_end());
    assert_eq!(record.message_count, 5);
    // "grateful" is outside the label set
    assert_eq!(record.emotion_counts.total(), 1);
    assert_eq!(record.primary_emotion(), Emotion::Fearful);
    assert_eq!(record.duration_minutes(), 10);
}

#[test]
fn test_transcript_without_times() {
    let t = Transcript::parse(r#"{"messages":[{"text":"hi","sender":"user"}]}"#).unwrap();
    assert!(t.resolved_start().is_err());
    assert_eq!(t.resolved_end(), None);

    let explicit = Transcript::parse(
        r#"{"sessionId":"  ","startTime":"2025-02-01T12:00:00Z","messages":[]}"#,
    )
    .unwrap();
    let start = explicit.resolved_start().unwrap();
    assert!(explicit.resolved_id(start).starts_with("session_"));

    assert!(Transcript::parse("{}").is_err());
}

fn sample_dashboard() -> Dashboard {
    let start = Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap();
    let mut counts = EmotionCounts::new();
    counts.add(Emotion::Happy, 3);
    counts.add(Emotion::Sad, 1);
    let records = vec![
        SessionRecord {
            session_id: "a".into(),
            start_time: start,
            end_time: Some(start + Duration::minutes(6)),
            message_count: 8,
            emotion_counts: counts,
        },
        SessionRecord {
            session_id: "b".into(),
            start_time: start + Duration::days(1),
            end_time: None,
            message_count: 2,
            emotion_counts: EmotionCounts::new(),
        },
    ];
    Dashboard::from_records(records, 10)
}

#[test]
fn test_render_text() {
    let text = render_text(&sample_dashboard());
    assert!(text.contains("Total Sessions"));
    assert!(text.contains("3.0"));
    assert!(text.contains("happy"));
    assert!(text.contains(" 75%"));
    assert!(text.contains("Page 1 of 1"));
    assert!(text.contains("2025-01-11"));

    let empty = render_text(&Dashboard::from_records(vec![], 10));
    assert!(empty.contains("No sessions yet"));
}

#[test]
fn test_render_json() {
    let json = render_json(&sample_dashboard()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["total_sessions"], 2);
    assert_eq!(value["total_messages"], 10);
    assert_eq!(value["page"], 1);
    assert_eq!(value["total_pages"], 1);
    assert_eq!(value["emotion_percentages"][0]["emotion"], "happy");
    assert_eq!(value["emotion_percentages"][0]["percentage"], 75);
    assert_eq!(value["sessions"][0]["session_id"], "b");
    assert_eq!(value["sessions"][0]["primary_emotion"], "neutral");
    assert_eq!(value["sessions"][1]["duration_minutes"], 6);
}

#[test]
fn test_render_recorded() {
    let start = Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap();
    let record = build_record("s9", &[], start, Some(start + Duration::minutes(2)));
    assert_eq!(
        render_recorded(&record),
        "Recorded s9 (0 messages, 2 min, mostly neutral)"
    );
}
