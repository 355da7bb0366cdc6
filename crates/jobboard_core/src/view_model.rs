use crate::{derive_site, AppState, MatchingJob, RunPhase};

pub const EMPTY_TABLE_PLACEHOLDER: &str =
    "No matching jobs found. Click \"Scrape & Match\" to start.";
pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Viewed,
    NewMatch,
    Match,
}

impl Badge {
    /// Viewed wins over the recency flag.
    pub fn for_job(job: &MatchingJob) -> Self {
        if job.is_viewed() {
            Badge::Viewed
        } else if job.is_new {
            Badge::NewMatch
        } else {
            Badge::Match
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Badge::Viewed => "Viewed",
            Badge::NewMatch => "New Match",
            Badge::Match => "Match",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRowView {
    pub url: String,
    pub title: String,
    pub site: String,
    pub score: f64,
    pub matched_at: String,
    pub badge: Badge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDetailView {
    pub url: String,
    pub title: String,
    pub site: String,
    pub score: f64,
    pub description: String,
    pub badge: Badge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsView {
    pub total_urls: u64,
    pub total_details: u64,
    pub seen_count: u64,
    pub site_count: usize,
    pub match_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLineView {
    pub text: String,
    /// Pipeline step banners start with `>>>`.
    pub is_step: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunView {
    pub phase: RunPhase,
    pub start_enabled: bool,
    pub log_visible: bool,
    pub logs: Vec<LogLineView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViewModel {
    pub stats: StatsView,
    pub sites: Vec<String>,
    pub search_term: String,
    pub site_filter: Option<String>,
    pub rows: Vec<JobRowView>,
    pub placeholder: Option<&'static str>,
    pub pagination: PaginationView,
    pub detail: Option<JobDetailView>,
    pub run: RunView,
}

pub(crate) fn present(state: &AppState) -> DashboardViewModel {
    let slice = state.view.page_of(&state.store);

    let (rows, placeholder, pagination) = if slice.total == 0 {
        (
            Vec::new(),
            Some(EMPTY_TABLE_PLACEHOLDER),
            PaginationView {
                page: 1,
                total_pages: 1,
                total: 0,
                has_prev: false,
                has_next: false,
            },
        )
    } else {
        let rows = slice.rows.iter().map(|job| row_view(job)).collect();
        let pagination = PaginationView {
            page: slice.page,
            total_pages: slice.total_pages,
            total: slice.total,
            has_prev: slice.page > 1,
            has_next: slice.page < slice.total_pages,
        };
        (rows, None, pagination)
    };

    let detail = state
        .selected
        .as_deref()
        .and_then(|url| state.store.find(url))
        .map(detail_view);

    DashboardViewModel {
        stats: StatsView {
            total_urls: state.stats.total_urls,
            total_details: state.stats.total_details,
            seen_count: state.stats.seen_count,
            site_count: state.sites.len(),
            match_count: state.store.len(),
        },
        sites: state.sites.clone(),
        search_term: state.view.search_term().to_string(),
        site_filter: state.view.site_filter().map(ToOwned::to_owned),
        rows,
        placeholder,
        pagination,
        detail,
        run: RunView {
            phase: state.run.phase(),
            start_enabled: state.run.start_enabled(),
            log_visible: state.run.log_visible(),
            logs: state
                .run
                .logs()
                .iter()
                .map(|line| LogLineView {
                    is_step: line.trim_start().starts_with(">>>"),
                    text: line.clone(),
                })
                .collect(),
        },
    }
}

fn row_view(job: &MatchingJob) -> JobRowView {
    JobRowView {
        url: job.url.clone(),
        title: job.title.clone(),
        site: derive_site(&job.url),
        score: job.score,
        matched_at: job.matched_at.clone(),
        badge: Badge::for_job(job),
    }
}

fn detail_view(job: &MatchingJob) -> JobDetailView {
    let description = job
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();
    JobDetailView {
        url: job.url.clone(),
        title: job.title.clone(),
        site: derive_site(&job.url),
        score: job.score,
        description,
        badge: Badge::for_job(job),
    }
}
