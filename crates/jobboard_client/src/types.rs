use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Poll generation, echoed back with every status result.
pub type Generation = u64;

/// One entry of `GET /api/matching/jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingJobRecord {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub matched_at: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_new: bool,
}

/// `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsRecord {
    #[serde(default)]
    pub total_urls: u64,
    #[serde(default)]
    pub total_details: u64,
    #[serde(default)]
    pub seen_count: u64,
    #[serde(default)]
    pub sites: BTreeMap<String, u64>,
}

/// `POST /api/scrape/full`. A rejection still comes back with a 2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/scrape/status`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrapeStatusRecord {
    pub running: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub current_step: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ViewRequest<'a> {
    pub url: &'a str,
}

/// Results delivered to an [`EventSink`](crate::EventSink).
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    JobsLoaded(Result<Vec<MatchingJobRecord>, BackendError>),
    StatsLoaded(Result<StatsRecord, BackendError>),
    ViewedMarked {
        url: String,
        result: Result<(), BackendError>,
    },
    ScrapeStarted(Result<StartResponse, BackendError>),
    StatusPolled {
        generation: Generation,
        result: Result<ScrapeStatusRecord, BackendError>,
    },
    DebounceElapsed {
        token: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
