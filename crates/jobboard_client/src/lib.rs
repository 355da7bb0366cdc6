//! Dashboard client: backend calls, the status poller and the search debouncer,
//! executed on a tokio runtime thread behind a command channel.
mod backend;
mod debounce;
mod handle;
mod poller;
mod sink;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend, DEFAULT_ENDPOINT};
pub use debounce::Debouncer;
pub use handle::BackendHandle;
pub use poller::{StatusPoller, DEFAULT_POLL_INTERVAL};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{
    BackendError, BackendEvent, FailureKind, Generation, MatchingJobRecord, ScrapeStatusRecord,
    StartResponse, StatsRecord,
};
