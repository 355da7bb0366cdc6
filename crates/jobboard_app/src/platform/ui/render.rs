use chrono::{DateTime, NaiveDate, NaiveDateTime};
use jobboard_core::{DashboardViewModel, JobDetailView, JobRowView, RunPhase, RunView};

/// Log lines shown under the table while the panel is open.
pub const LOG_TAIL: usize = 12;
const TITLE_WIDTH: usize = 48;

/// Renders one full frame of the dashboard.
pub fn render(view: &DashboardViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "URLs: {} | Details: {} | Seen: {} | Sites: {} | Matches: {}",
        format_with_commas(view.stats.total_urls),
        format_with_commas(view.stats.total_details),
        format_with_commas(view.stats.seen_count),
        view.stats.site_count,
        view.stats.match_count,
    ));
    lines.push(format!(
        "Search: {:?} | Site: {} | Run: {}{}",
        view.search_term,
        view.site_filter.as_deref().unwrap_or("All Sites"),
        phase_label(view.run.phase),
        if view.run.start_enabled {
            ""
        } else {
            " (scrape disabled)"
        },
    ));
    if !view.sites.is_empty() {
        lines.push(format!("Known sites: {}", view.sites.join(", ")));
    }
    lines.push(String::new());

    match view.placeholder {
        Some(placeholder) => lines.push(placeholder.to_string()),
        None => {
            lines.push(format!(
                "{:>3}  {:<width$}  {:<12}  {:>5}  {:<10}  {}",
                "#",
                "Title",
                "Site",
                "Score",
                "Matched",
                "Status",
                width = TITLE_WIDTH
            ));
            for (index, row) in view.rows.iter().enumerate() {
                lines.push(row_line(index + 1, row));
            }
        }
    }

    let pagination = &view.pagination;
    lines.push(format!(
        "Page {} of {} ({} jobs){}{}",
        pagination.page,
        pagination.total_pages,
        pagination.total,
        if pagination.has_prev { " [prev]" } else { "" },
        if pagination.has_next { " [next]" } else { "" },
    ));

    if let Some(detail) = &view.detail {
        lines.push(String::new());
        lines.extend(detail_lines(detail));
    }

    if view.run.log_visible {
        lines.push(String::new());
        lines.extend(log_lines(&view.run));
    }

    lines
}

fn row_line(number: usize, row: &JobRowView) -> String {
    format!(
        "{:>3}  {:<width$}  {:<12}  {:>5}  {:<10}  {}",
        number,
        truncate(&row.title, TITLE_WIDTH),
        truncate(&row.site, 12),
        format_percent(row.score),
        format_date(&row.matched_at),
        row.badge.label(),
        width = TITLE_WIDTH
    )
}

fn detail_lines(detail: &JobDetailView) -> Vec<String> {
    vec![
        format!("== {} ==", detail.title),
        format!("Site: {} | {}", detail.site, detail.badge.label()),
        format!("Match Score: {:.1}%", detail.score * 100.0),
        format!("Link: {}", detail.url),
        String::new(),
        detail.description.clone(),
    ]
}

fn log_lines(run: &RunView) -> Vec<String> {
    let mut lines = vec![format!("-- Run log ({}) --", phase_label(run.phase))];
    let skip = run.logs.len().saturating_sub(LOG_TAIL);
    for line in run.logs.iter().skip(skip) {
        if line.is_step {
            lines.push(format!("* {}", line.text));
        } else {
            lines.push(format!("  {}", line.text));
        }
    }
    lines
}

fn phase_label(phase: RunPhase) -> &'static str {
    match phase {
        RunPhase::Idle => "Idle",
        RunPhase::Starting => "Starting",
        RunPhase::Running => "Running",
        RunPhase::Completed => "Completed",
        RunPhase::Failed => "Failed",
    }
}

/// `0.92` becomes `92%`.
fn format_percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

/// Reduces backend timestamps to a calendar date; unparseable values pass through.
fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.date_naive().to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.date().to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return parsed.date().to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.to_string();
    }
    raw.to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
