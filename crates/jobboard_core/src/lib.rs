//! Dashboard core: pure session state, filter/pagination engine and the
//! scrape run-and-poll state machine. No I/O happens here.
mod effect;
mod model;
mod msg;
mod orchestrator;
mod state;
mod store;
mod update;
mod view_model;
mod view_state;

pub use effect::Effect;
pub use model::{JobStatus, MatchingJob, RunSnapshot, StartReply, StatsSnapshot, TransportFailure};
pub use msg::Msg;
pub use orchestrator::{
    PollErrorPolicy, PollGeneration, RunPhase, ScrapeOrchestrator, CONNECT_ERROR_LINE, START_LINE,
};
pub use state::{AppState, DashboardConfig, DEFAULT_SEARCH_DEBOUNCE};
pub use store::JobStore;
pub use update::update;
pub use view_model::{
    Badge, DashboardViewModel, JobDetailView, JobRowView, LogLineView, PaginationView, RunView,
    StatsView, EMPTY_TABLE_PLACEHOLDER, NO_DESCRIPTION,
};
pub use view_state::{
    derive_site, total_pages, PageSlice, ViewState, DEFAULT_PAGE_SIZE, UNKNOWN_SITE,
};
