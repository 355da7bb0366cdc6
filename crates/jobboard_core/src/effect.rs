use std::time::Duration;

use crate::PollGeneration;

/// Work the runtime must carry out on behalf of `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the full matching-job snapshot.
    LoadJobs,
    /// Fetch aggregate counts and the site list.
    LoadStats,
    /// Record the viewed transition upstream.
    PersistViewed { url: String },
    /// Ask the backend to begin a full run.
    StartScrape,
    /// Cancel any active poller, then poll the run status for `generation`.
    StartPolling { generation: PollGeneration },
    /// Cancel the poller for `generation` if it is still the active one.
    StopPolling { generation: PollGeneration },
    /// Deliver `Msg::SearchDebounceElapsed { token }` after `delay`, replacing any pending timer.
    ScheduleSearch { token: u64, delay: Duration },
}
