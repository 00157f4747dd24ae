use chrono::NaiveDate;
use serde::Serialize;
use std::ops::Range;

use crate::core::emotion::{Emotion, EmotionCounts};
use crate::core::ledger::Ledger;
use crate::core::session::SessionRecord;

pub const DEFAULT_PAGE_SIZE: usize = 10;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionShare {
    pub emotion: Emotion,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_sessions: usize,
    pub total_messages: u64,
    pub average_duration_minutes: f64,
    pub emotion_percentages: Vec<EmotionShare>,
}

/// Aggregate statistics over a ledger snapshot.
///
/// Sessions without an end time add nothing to the duration sum but still
/// count in the average's denominator.
pub fn summarize(records: &[SessionRecord]) -> DashboardSummary {
    let total_sessions = records.len();
    let total_messages = records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.message_count));

    let average_duration_minutes = if total_sessions > 0 {
        let total_ms = records
            .iter()
            .filter_map(|r| r.duration())
            .fold(0i64, |acc, d| acc.saturating_add(d.num_milliseconds()));
        total_ms as f64 / total_sessions as f64 / MS_PER_MINUTE
    } else {
        0.0
    };

    let mut emotions = EmotionCounts::new();
    for record in records {
        emotions.merge(&record.emotion_counts);
    }

    DashboardSummary {
        total_sessions,
        total_messages,
        average_duration_minutes,
        emotion_percentages: emotion_percentages(&emotions),
    }
}

/// Rounded share of each label seen at least once. Empty when nothing was
/// seen, so the shares sum to zero in that case.
pub fn emotion_percentages(counts: &EmotionCounts) -> Vec<EmotionShare> {
    let total = counts.total();
    if total == 0 {
        return Vec::new();
    }
    counts
        .non_zero()
        .map(|(emotion, count)| EmotionShare {
            emotion,
            percentage: (100.0 * count as f64 / total as f64).round() as u32,
        })
        .collect()
}

/// Most recent session first.
pub fn sort_for_display(records: &mut [SessionRecord]) {
    records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
}

/// 1-based page cursor over a fixed item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    total_items: usize,
    current: usize,
}

impl Paginator {
    pub fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total_items,
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves to `page`. Out-of-range requests leave the cursor where it is
    /// and return `false`.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.current = page;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn prev(&mut self) -> bool {
        self.go_to(self.current.saturating_sub(1))
    }

    pub fn range(&self) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(self.total_items);
        let end = (self.current * self.page_size).min(self.total_items);
        start..end
    }

    pub fn items<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(all.len());
        let start = range.start.min(end);
        &all[start..end]
    }
}

/// One line of the session history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub session_id: String,
    pub date: NaiveDate,
    pub duration_minutes: i64,
    pub message_count: u64,
    pub primary_emotion: Emotion,
}

impl From<&SessionRecord> for SessionRow {
    fn from(record: &SessionRecord) -> Self {
        Self {
            session_id: record.session_id.clone(),
            date: record.start_time.date_naive(),
            duration_minutes: record.duration_minutes(),
            message_count: record.message_count,
            primary_emotion: record.primary_emotion(),
        }
    }
}

/// Snapshot of the ledger prepared for display.
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<SessionRecord>,
    summary: DashboardSummary,
    paginator: Paginator,
}

impl Dashboard {
    /// Reads the whole ledger once. A failed read yields an empty dashboard.
    pub async fn load(ledger: &dyn Ledger, page_size: usize) -> Self {
        let records = match ledger.read_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session ledger; showing no data");
                Vec::new()
            }
        };
        tracing::debug!(sessions = records.len(), "dashboard loaded");
        Self::from_records(records, page_size)
    }

    pub fn from_records(mut records: Vec<SessionRecord>, page_size: usize) -> Self {
        sort_for_display(&mut records);
        let summary = summarize(&records);
        let paginator = Paginator::new(records.len(), page_size);
        Self {
            records,
            summary,
            paginator,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Sorted, newest first.
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn go_to(&mut self, page: usize) -> bool {
        self.paginator.go_to(page)
    }

    pub fn current_page(&self) -> &[SessionRecord] {
        self.paginator.items(&self.records)
    }

    pub fn rows(&self) -> Vec<SessionRow> {
        self.current_page().iter().map(SessionRow::from).collect()
    }
}
