mod dashboard;
mod recorder;


pub use dashboard::{
    emotion_percentages, sort_for_display, summarize, Dashboard, DashboardSummary, EmotionShare,
    Paginator, SessionRow, DEFAULT_PAGE_SIZE,
};
pub use recorder::{build_record, SessionRecorder};
