use board_logging::{board_debug, board_info, board_warn};

use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Init | Msg::RefreshRequested => vec![Effect::LoadStats, Effect::LoadJobs],
        Msg::JobsLoaded(Ok(jobs)) => {
            board_info!("Loaded {} matching jobs", jobs.len());
            state.replace_jobs(jobs);
            Vec::new()
        }
        Msg::JobsLoaded(Err(failure)) => {
            // The dashboard stays usable with an empty table.
            board_warn!("Error loading matching jobs: {}", failure);
            state.clear_jobs();
            Vec::new()
        }
        Msg::StatsLoaded(Ok(stats)) => {
            state.apply_stats(stats);
            Vec::new()
        }
        Msg::StatsLoaded(Err(failure)) => {
            board_warn!("Error loading stats: {}", failure);
            Vec::new()
        }
        Msg::SearchInput(text) => {
            state.pending_search = text;
            state.search_token += 1;
            vec![Effect::ScheduleSearch {
                token: state.search_token,
                delay: state.search_debounce,
            }]
        }
        Msg::SearchDebounceElapsed { token } => {
            if token == state.search_token {
                let term = std::mem::take(&mut state.pending_search);
                apply_search(&mut state, &term);
            } else {
                board_debug!("Superseded search timer {} ignored", token);
            }
            Vec::new()
        }
        Msg::SearchSubmitted(text) => {
            // Invalidate any pending debounced input so it cannot overwrite this term.
            state.search_token += 1;
            state.pending_search.clear();
            apply_search(&mut state, &text);
            Vec::new()
        }
        Msg::SiteFilterChanged(site) => {
            let site = site.filter(|s| !s.trim().is_empty());
            match site.as_deref() {
                Some(name) if !state.is_known_site(name.trim()) => {
                    board_warn!("Ignoring unknown site filter {:?}", name);
                }
                requested => {
                    if state.view.set_site_filter(requested) {
                        state.mark_dirty();
                    }
                }
            }
            Vec::new()
        }
        Msg::NextPage => {
            let total_pages = state.view.total_pages_for(&state.store);
            if state.view.next_page(total_pages) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PrevPage => {
            if state.view.prev_page() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PageRequested(page) => {
            let total_pages = state.view.total_pages_for(&state.store);
            if state.view.go_to_page(page, total_pages) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::OpenJob { url } => open_job(&mut state, url),
        Msg::CloseJob => {
            if state.selected.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ViewedPersisted { url, result } => {
            match result {
                Ok(()) => board_debug!("Viewed state persisted for {}", url),
                Err(failure) => {
                    board_warn!("Error marking job as viewed ({}): {}", url, failure)
                }
            }
            Vec::new()
        }
        Msg::StartScrapeClicked => match state.run.request_start() {
            Some(effects) => {
                state.mark_dirty();
                effects
            }
            None => Vec::new(),
        },
        Msg::ScrapeStartFinished(reply) => {
            let effects = state.run.start_finished(reply);
            state.mark_dirty();
            effects
        }
        Msg::ScrapeStatusReceived { generation, result } => {
            let (effects, changed) = state.run.status_received(generation, result);
            if changed {
                state.mark_dirty();
            }
            effects
        }
        Msg::ShowLogPanel => {
            if state.run.set_log_visible(true) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::CloseLogPanel => {
            if state.run.set_log_visible(false) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DismissOverlays => {
            let closed_detail = state.selected.take().is_some();
            let closed_logs = state.run.set_log_visible(false);
            if closed_detail || closed_logs {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_search(state: &mut AppState, term: &str) {
    if state.view.set_search_term(term) {
        state.mark_dirty();
    }
}

/// Marks the job viewed before selecting it, so the detail view renders the
/// post-transition badge.
fn open_job(state: &mut AppState, url: String) -> Vec<Effect> {
    if state.store.find(&url).is_none() {
        board_debug!("Open ignored for unknown job {}", url);
        return Vec::new();
    }

    let mut effects = Vec::new();
    if state.store.mark_viewed(&url) {
        effects.push(Effect::PersistViewed { url: url.clone() });
        state.reclamp_page();
    }
    state.selected = Some(url);
    state.mark_dirty();
    effects
}
