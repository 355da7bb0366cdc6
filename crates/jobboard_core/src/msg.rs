use crate::{
    MatchingJob, PollGeneration, RunSnapshot, StartReply, StatsSnapshot, TransportFailure,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Session opened; load the initial data.
    Init,
    /// Operator asked for a reload of jobs and stats.
    RefreshRequested,
    /// Job snapshot arrived (or failed).
    JobsLoaded(Result<Vec<MatchingJob>, TransportFailure>),
    /// Stats snapshot arrived (or failed).
    StatsLoaded(Result<StatsSnapshot, TransportFailure>),
    /// Operator typed in the search box (debounced).
    SearchInput(String),
    /// The debounce timer for `token` fired.
    SearchDebounceElapsed { token: u64 },
    /// Apply a search term immediately, bypassing the debounce.
    SearchSubmitted(String),
    /// Operator picked a site; `None` or an empty name means all sites.
    SiteFilterChanged(Option<String>),
    NextPage,
    PrevPage,
    PageRequested(usize),
    /// Operator opened a job's detail view.
    OpenJob { url: String },
    CloseJob,
    /// Result of persisting a viewed transition upstream.
    ViewedPersisted {
        url: String,
        result: Result<(), TransportFailure>,
    },
    /// Operator clicked the start control.
    StartScrapeClicked,
    /// Backend answered the start request.
    ScrapeStartFinished(Result<StartReply, TransportFailure>),
    /// A poll tick completed.
    ScrapeStatusReceived {
        generation: PollGeneration,
        result: Result<RunSnapshot, TransportFailure>,
    },
    ShowLogPanel,
    CloseLogPanel,
    /// Close every overlay (detail view and log panel).
    DismissOverlays,
    /// Fallback for placeholder wiring.
    NoOp,
}
