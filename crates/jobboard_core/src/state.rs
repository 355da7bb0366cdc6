use std::time::Duration;

use board_logging::board_warn;

use crate::view_model::{present, DashboardViewModel};
use crate::{
    JobStore, MatchingJob, PollErrorPolicy, ScrapeOrchestrator, StatsSnapshot, ViewState,
    DEFAULT_PAGE_SIZE,
};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Session-wide settings that stay fixed once the dashboard is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub page_size: usize,
    pub search_debounce: Duration,
    pub poll_error_policy: PollErrorPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            poll_error_policy: PollErrorPolicy::KeepPolling,
        }
    }
}

/// All state owned by one dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) store: JobStore,
    pub(crate) view: ViewState,
    pub(crate) stats: StatsSnapshot,
    pub(crate) sites: Vec<String>,
    pub(crate) run: ScrapeOrchestrator,
    pub(crate) selected: Option<String>,
    pub(crate) pending_search: String,
    pub(crate) search_token: u64,
    pub(crate) search_debounce: Duration,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        Self {
            store: JobStore::new(),
            view: ViewState::new(config.page_size),
            stats: StatsSnapshot::default(),
            sites: Vec::new(),
            run: ScrapeOrchestrator::new(config.poll_error_policy),
            selected: None,
            pending_search: String::new(),
            search_token: 0,
            search_debounce: config.search_debounce,
            dirty: false,
        }
    }

    pub fn view(&self) -> DashboardViewModel {
        present(self)
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn orchestrator(&self) -> &ScrapeOrchestrator {
        &self.run
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn replace_jobs(&mut self, jobs: Vec<MatchingJob>) {
        self.store.replace(jobs);
        self.after_store_change();
    }

    pub(crate) fn clear_jobs(&mut self) {
        self.store.clear();
        self.after_store_change();
    }

    fn after_store_change(&mut self) {
        let evicted = self
            .selected
            .as_deref()
            .is_some_and(|url| self.store.find(url).is_none());
        if evicted {
            self.selected = None;
        }
        self.reclamp_page();
        self.mark_dirty();
    }

    pub(crate) fn reclamp_page(&mut self) {
        let total_pages = self.view.total_pages_for(&self.store);
        self.view.clamp(total_pages);
    }

    pub(crate) fn apply_stats(&mut self, stats: StatsSnapshot) {
        self.sites = stats.sites.keys().cloned().collect();
        self.stats = stats;
        let stale_filter = self
            .view
            .site_filter()
            .filter(|site| !self.is_known_site(site))
            .map(ToOwned::to_owned);
        if let Some(site) = stale_filter {
            board_warn!("Site filter {:?} no longer known; showing all sites", site);
            self.view.set_site_filter(None);
        }
        self.reclamp_page();
        self.mark_dirty();
    }

    pub(crate) fn is_known_site(&self, site: &str) -> bool {
        self.sites.iter().any(|known| known == site)
    }
}
