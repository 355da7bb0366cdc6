use std::collections::BTreeMap;
use std::fmt;

/// Review status as recorded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    New,
    Viewed,
}

impl JobStatus {
    /// Maps a backend status string. Anything other than `viewed` counts as unviewed.
    pub fn from_wire(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("viewed") {
            JobStatus::Viewed
        } else {
            JobStatus::New
        }
    }
}

/// A job posting the pipeline scored against the operator's criteria.
///
/// `url` is the identity key. `status` and `is_new` are carried independently:
/// `is_new` marks recency (surfaced by the latest run), `status` marks interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingJob {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    /// Match confidence in `[0, 1]`.
    pub score: f64,
    /// Upstream timestamp, kept verbatim; formatting is left to the renderer.
    pub matched_at: String,
    pub status: JobStatus,
    pub is_new: bool,
}

impl MatchingJob {
    pub fn is_viewed(&self) -> bool {
        self.status == JobStatus::Viewed
    }
}

/// Aggregate counts reported by the stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub total_urls: u64,
    pub total_details: u64,
    pub seen_count: u64,
    pub sites: BTreeMap<String, u64>,
}

/// One observation of the backend run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSnapshot {
    pub running: bool,
    pub message: String,
    pub logs: Vec<String>,
}

/// Backend answer to a start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReply {
    pub success: bool,
    pub message: Option<String>,
}

/// A failed backend call, reduced to what the state machine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure(pub String);

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
