#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Once;

use jobboard_core::{update, AppState, Effect, JobStatus, MatchingJob, Msg, StatsSnapshot};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(board_logging::initialize_for_tests);
}

pub fn job(url: &str, title: &str, score: f64) -> MatchingJob {
    MatchingJob {
        url: url.to_string(),
        title: title.to_string(),
        description: Some(format!("Description of {title}")),
        score,
        matched_at: "2025-03-01T12:00:00.000000".to_string(),
        status: JobStatus::New,
        is_new: true,
    }
}

/// `count` jobs spread over the given sites, in that order.
pub fn jobs_on(sites: &[&str], count: usize) -> Vec<MatchingJob> {
    (0..count)
        .map(|i| {
            let site = sites[i % sites.len()];
            job(
                &format!("https://www.{site}.com/jobs/{i}"),
                &format!("Engineer {i}"),
                0.5,
            )
        })
        .collect()
}

pub fn stats_for(sites: &[&str]) -> StatsSnapshot {
    StatsSnapshot {
        total_urls: 100,
        total_details: 80,
        seen_count: 3,
        sites: sites
            .iter()
            .map(|site| (site.to_string(), 1))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn loaded(jobs: Vec<MatchingJob>) -> AppState {
    let (state, _) = update(AppState::new(), Msg::JobsLoaded(Ok(jobs)));
    state
}

pub fn send(state: AppState, msg: Msg) -> AppState {
    update(state, msg).0
}

pub fn search_now(state: AppState, term: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::SearchSubmitted(term.to_string()))
}
