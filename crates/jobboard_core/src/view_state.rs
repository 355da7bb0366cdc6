use url::Url;

use crate::{JobStore, MatchingJob};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const UNKNOWN_SITE: &str = "unknown";

/// Short site label for a job url: host without a leading `www.`, first label only.
///
/// Never fails; anything unparseable or hostless is `"unknown"`.
pub fn derive_site(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return UNKNOWN_SITE.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return UNKNOWN_SITE.to_string();
    };
    let host = host.strip_prefix("www.").unwrap_or(host);
    match host.split('.').next() {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => UNKNOWN_SITE.to_string(),
    }
}

/// `max(1, ceil(count / page_size))`.
pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    filtered_count.div_ceil(page_size.max(1)).max(1)
}

/// One rendered page of the filtered job set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'a> {
    pub rows: Vec<&'a MatchingJob>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Operator-entered search, site filter and page position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search_term: String,
    site_filter: Option<String>,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            site_filter: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn site_filter(&self) -> Option<&str> {
        self.site_filter.as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns `true` if the term changed; a change resets the page to 1.
    pub fn set_search_term(&mut self, term: &str) -> bool {
        if self.search_term == term {
            return false;
        }
        self.search_term = term.to_string();
        self.page = 1;
        true
    }

    /// Returns `true` if the filter changed; a change resets the page to 1.
    /// An empty name means all sites.
    pub fn set_site_filter(&mut self, site: Option<&str>) -> bool {
        let site = site.map(str::trim).filter(|s| !s.is_empty());
        if self.site_filter.as_deref() == site {
            return false;
        }
        self.site_filter = site.map(ToOwned::to_owned);
        self.page = 1;
        true
    }

    /// Jumps to `page`, clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        let target = page.clamp(1, total_pages.max(1));
        let changed = target != self.page;
        self.page = target;
        changed
    }

    pub fn next_page(&mut self, total_pages: usize) -> bool {
        if self.page < total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Re-clamps the page after the underlying set changed size.
    pub fn clamp(&mut self, total_pages: usize) {
        self.page = self.page.clamp(1, total_pages.max(1));
    }

    pub fn matches(&self, job: &MatchingJob) -> bool {
        let term = self.search_term.to_lowercase();
        let matches_search = term.is_empty()
            || job.title.to_lowercase().contains(&term)
            || job.url.to_lowercase().contains(&term);
        let matches_site = match &self.site_filter {
            None => true,
            Some(site) => derive_site(&job.url) == *site,
        };
        matches_search && matches_site
    }

    /// The filtered sequence, in store order.
    pub fn filtered<'a>(&self, store: &'a JobStore) -> Vec<&'a MatchingJob> {
        store.iter().filter(|job| self.matches(job)).collect()
    }

    pub fn total_pages_for(&self, store: &JobStore) -> usize {
        total_pages(self.filtered(store).len(), self.page_size)
    }

    /// Slices out the current page. The page is clamped here as well so a stale
    /// position can never index past the end.
    pub fn page_of<'a>(&self, store: &'a JobStore) -> PageSlice<'a> {
        let filtered = self.filtered(store);
        let total = filtered.len();
        let total_pages = total_pages(total, self.page_size);
        let page = self.page.clamp(1, total_pages);
        let start = (page - 1) * self.page_size;
        let rows = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();
        PageSlice {
            rows,
            page,
            total_pages,
            total,
        }
    }
}
