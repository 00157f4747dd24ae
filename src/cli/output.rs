use crate::analytics::{Dashboard, SessionRow};
use crate::core::session::SessionRecord;
use serde::Serialize;

const BAR_WIDTH: usize = 30;

#[derive(Serialize)]
struct DashboardJson<'a> {
    #[serde(flatten)]
    summary: &'a crate::analytics::DashboardSummary,
    page: usize,
    total_pages: usize,
    sessions: Vec<SessionRow>,
}

pub fn render_json(dashboard: &Dashboard) -> anyhow::Result<String> {
    let out = DashboardJson {
        summary: dashboard.summary(),
        page: dashboard.paginator().current(),
        total_pages: dashboard.paginator().total_pages(),
        sessions: dashboard.rows(),
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn render_text(dashboard: &Dashboard) -> String {
    if dashboard.is_empty() {
        return "\x1b[1mNo sessions yet\x1b[0m\n\
                Start your first session to begin tracking your emotional well-being.\n"
            .to_string();
    }

    let summary = dashboard.summary();
    let mut out = String::new();

    out.push_str("\x1b[1;36mYour Dashboard\x1b[0m\n\n");
    out.push_str(&format!(
        "  Total Sessions  \x1b[1m{}\x1b[0m\n",
        summary.total_sessions
    ));
    out.push_str(&format!(
        "  Total Messages  \x1b[1m{}\x1b[0m\n",
        summary.total_messages
    ));
    out.push_str(&format!(
        "  Avg. Duration   \x1b[1m{:.1}\x1b[0m min\n\n",
        summary.average_duration_minutes
    ));

    out.push_str("\x1b[1mEmotion Distribution\x1b[0m\n");
    for share in &summary.emotion_percentages {
        let filled = (share.percentage as usize * BAR_WIDTH / 100).min(BAR_WIDTH);
        out.push_str(&format!(
            "  {:<10} {:>3}% \x1b[36m{}\x1b[90m{}\x1b[0m\n",
            share.emotion,
            share.percentage,
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH - filled),
        ));
    }

    let pager = dashboard.paginator();
    out.push_str(&format!(
        "\n\x1b[1mSession History\x1b[0m  \x1b[90mPage {} of {}\x1b[0m\n",
        pager.current(),
        pager.total_pages()
    ));
    out.push_str(&format!(
        "  {:<12} {:>9} {:>9}  {}\n",
        "DATE", "DURATION", "MESSAGES", "PRIMARY EMOTION"
    ));
    for row in dashboard.rows() {
        out.push_str(&format!(
            "  {:<12} {:>5} min {:>9}  {}\n",
            row.date.format("%Y-%m-%d"),
            row.duration_minutes,
            row.message_count,
            row.primary_emotion,
        ));
    }
    out
}

pub fn render_recorded(record: &SessionRecord) -> String {
    format!(
        "Recorded {} ({} messages, {} min, mostly {})",
        record.session_id,
        record.message_count,
        record.duration_minutes(),
        record.primary_emotion(),
    )
}
