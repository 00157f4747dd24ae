use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::EmotionParseError;

/// Emotion labels the detector can produce.
///
/// Declaration order doubles as iteration order for [`EmotionCounts`], which
/// decides ties when picking a primary emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Neutral,
    Angry,
    Surprised,
    Fearful,
    Disgusted,
}

impl Emotion {
    pub const COUNT: usize = 7;

    pub const ALL: [Emotion; Self::COUNT] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Neutral,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Fearful,
        Emotion::Disgusted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Neutral => "neutral",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
        }
    }

    /// Short human-readable description shown next to a live label.
    pub fn description(&self) -> &'static str {
        match self {
            Emotion::Happy => "You seem to be in good spirits",
            Emotion::Sad => "You seem to be feeling down",
            Emotion::Neutral => "You seem calm and composed",
            Emotion::Angry => "You seem frustrated or upset",
            Emotion::Surprised => "You seem surprised",
            Emotion::Fearful => "You seem worried or anxious",
            Emotion::Disgusted => "You seem uncomfortable",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = EmotionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| EmotionParseError(s.to_string()))
    }
}

/// Serde helper: unknown or null labels become `None` instead of failing the
/// surrounding value.
pub fn lenient_label<'de, D>(deserializer: D) -> Result<Option<Emotion>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|label| label.parse().ok()))
}

/// Fixed-size histogram of emotion labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmotionCounts([u64; Emotion::COUNT]);

impl EmotionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, emotion: Emotion) {
        self.add(emotion, 1);
    }

    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, emotion: Emotion, count: u64) {
        let slot = &mut self.0[emotion.index()];
        *slot = slot.saturating_add(count);
    }

    pub fn get(&self, emotion: Emotion) -> u64 {
        self.0[emotion.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().fold(0, |acc, n| acc.saturating_add(*n))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn merge(&mut self, other: &EmotionCounts) {
        for (slot, count) in self.0.iter_mut().zip(other.0.iter()) {
            *slot = slot.saturating_add(*count);
        }
    }

    /// All labels with their counts, zeros included, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, u64)> + '_ {
        Emotion::ALL.into_iter().map(move |e| (e, self.get(e)))
    }

    pub fn non_zero(&self) -> impl Iterator<Item = (Emotion, u64)> + '_ {
        self.iter().filter(|(_, count)| *count > 0)
    }
}

impl FromIterator<Emotion> for EmotionCounts {
    fn from_iter<I: IntoIterator<Item = Emotion>>(iter: I) -> Self {
        let mut counts = EmotionCounts::new();
        for emotion in iter {
            counts.increment(emotion);
        }
        counts
    }
}

impl Serialize for EmotionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<(Emotion, u64)> = self.non_zero().collect();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (emotion, count) in entries {
            map.serialize_entry(emotion.as_str(), &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = EmotionCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of emotion labels to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut counts = EmotionCounts::new();
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    // Labels outside the closed set are dropped.
                    if let Ok(emotion) = label.parse::<Emotion>() {
                        counts.add(emotion, count);
                    }
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}
