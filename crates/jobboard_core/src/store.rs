use std::collections::HashSet;

use board_logging::board_warn;

use crate::{JobStatus, MatchingJob};

/// In-memory snapshot of matching jobs, in backend order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobStore {
    jobs: Vec<MatchingJob>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole set with a fresh snapshot.
    ///
    /// `url` is the identity key; if the snapshot repeats a url the first entry wins.
    pub fn replace(&mut self, jobs: Vec<MatchingJob>) {
        let mut seen = HashSet::with_capacity(jobs.len());
        let mut kept = Vec::with_capacity(jobs.len());
        for job in jobs {
            if seen.insert(job.url.clone()) {
                kept.push(job);
            } else {
                board_warn!("Dropping duplicate job url in snapshot: {}", job.url);
            }
        }
        self.jobs = kept;
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    pub fn find(&self, url: &str) -> Option<&MatchingJob> {
        self.jobs.iter().find(|job| job.url == url)
    }

    /// Moves a job to `Viewed` and clears `is_new`.
    ///
    /// Returns `true` only when a transition happened. Already-viewed and missing
    /// jobs are left alone.
    pub fn mark_viewed(&mut self, url: &str) -> bool {
        match self.jobs.iter_mut().find(|job| job.url == url) {
            Some(job) if job.status != JobStatus::Viewed => {
                job.status = JobStatus::Viewed;
                job.is_new = false;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchingJob> {
        self.jobs.iter()
    }
}
