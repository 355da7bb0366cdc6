//! Run-and-poll state machine for a backend scrape run.
//!
//! The orchestrator never performs I/O. It answers each observation with the
//! effects the runtime has to carry out, and it guards every poll result with a
//! generation number so that a superseded or finished poller cannot touch the log.

use board_logging::{board_debug, board_info, board_warn};

use crate::{Effect, RunSnapshot, StartReply, TransportFailure};

pub const START_LINE: &str = "Starting scrape process...";
pub const CONNECT_ERROR_LINE: &str = "Error connecting to server.";

/// Generation of a poll loop. Each accepted start gets a fresh one.
pub type PollGeneration = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Starting,
    Running,
    Completed,
    Failed,
}

impl RunPhase {
    /// The start control is available in every phase except these two.
    pub fn is_busy(self) -> bool {
        matches!(self, RunPhase::Starting | RunPhase::Running)
    }
}

/// What to do when a poll tick fails at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollErrorPolicy {
    /// Log and keep polling forever.
    #[default]
    KeepPolling,
    /// Fail the run after this many consecutive failed ticks.
    GiveUpAfter(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeOrchestrator {
    phase: RunPhase,
    logs: Vec<String>,
    /// Number of backend log lines already displayed. Synthetic lines are not counted.
    cursor: usize,
    last_generation: PollGeneration,
    active_poll: Option<PollGeneration>,
    consecutive_errors: u32,
    policy: PollErrorPolicy,
    log_visible: bool,
}

impl ScrapeOrchestrator {
    pub fn new(policy: PollErrorPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn active_poll(&self) -> Option<PollGeneration> {
        self.active_poll
    }

    pub fn start_enabled(&self) -> bool {
        !self.phase.is_busy()
    }

    pub fn log_visible(&self) -> bool {
        self.log_visible
    }

    pub fn set_log_visible(&mut self, visible: bool) -> bool {
        let changed = self.log_visible != visible;
        self.log_visible = visible;
        changed
    }

    /// `Idle -> Starting`. Returns `None` while a run is already in flight.
    pub fn request_start(&mut self) -> Option<Vec<Effect>> {
        if self.phase.is_busy() {
            board_debug!("Start ignored: run already {:?}", self.phase);
            return None;
        }

        let mut effects = Vec::with_capacity(2);
        // A terminal phase should not leave a poller behind, but never install a
        // second one on top of whatever is still registered.
        if let Some(generation) = self.active_poll.take() {
            effects.push(Effect::StopPolling { generation });
        }

        self.phase = RunPhase::Starting;
        self.logs.clear();
        self.logs.push(START_LINE.to_string());
        self.cursor = 0;
        self.consecutive_errors = 0;
        self.log_visible = true;
        effects.push(Effect::StartScrape);
        Some(effects)
    }

    /// Handles the backend answer to the start request.
    pub fn start_finished(&mut self, reply: Result<StartReply, TransportFailure>) -> Vec<Effect> {
        if self.phase != RunPhase::Starting {
            board_debug!("Late start reply ignored in phase {:?}", self.phase);
            return Vec::new();
        }

        match reply {
            Ok(StartReply { success: true, message }) => {
                self.last_generation += 1;
                let generation = self.last_generation;
                self.active_poll = Some(generation);
                self.phase = RunPhase::Running;
                board_info!(
                    "Scrape run accepted ({}); polling generation {}",
                    message.as_deref().unwrap_or("no message"),
                    generation
                );
                vec![Effect::StartPolling { generation }]
            }
            Ok(StartReply { success: false, message }) => {
                let message = message.unwrap_or_else(|| "start request rejected".to_string());
                board_warn!("Scrape run rejected: {}", message);
                self.logs.push(format!("Error: {message}"));
                self.phase = RunPhase::Failed;
                Vec::new()
            }
            Err(failure) => {
                board_warn!("Error starting full scrape: {}", failure);
                self.logs.push(CONNECT_ERROR_LINE.to_string());
                self.phase = RunPhase::Failed;
                Vec::new()
            }
        }
    }

    /// Handles one poll observation. Returns the effects to run and whether the
    /// visible state changed.
    pub fn status_received(
        &mut self,
        generation: PollGeneration,
        result: Result<RunSnapshot, TransportFailure>,
    ) -> (Vec<Effect>, bool) {
        if self.active_poll != Some(generation) {
            board_debug!(
                "Dropping status for generation {} (active {:?})",
                generation,
                self.active_poll
            );
            return (Vec::new(), false);
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(failure) => return self.poll_failed(generation, failure),
        };
        self.consecutive_errors = 0;

        let appended = self.append_new_lines(&snapshot.logs);
        if snapshot.running {
            return (Vec::new(), appended);
        }

        self.active_poll = None;
        self.phase = RunPhase::Completed;
        self.logs
            .push(format!("--- Process Completed: {} ---", snapshot.message));
        board_info!("Scrape run finished: {}", snapshot.message);
        (
            vec![
                Effect::StopPolling { generation },
                Effect::LoadStats,
                Effect::LoadJobs,
            ],
            true,
        )
    }

    /// Appends backend lines past the cursor. Re-observing a prefix appends nothing.
    fn append_new_lines(&mut self, observed: &[String]) -> bool {
        if observed.len() <= self.cursor {
            return false;
        }
        self.logs.extend(observed[self.cursor..].iter().cloned());
        self.cursor = observed.len();
        true
    }

    fn poll_failed(
        &mut self,
        generation: PollGeneration,
        failure: TransportFailure,
    ) -> (Vec<Effect>, bool) {
        self.consecutive_errors += 1;
        board_warn!(
            "Error checking status ({} in a row): {}",
            self.consecutive_errors,
            failure
        );

        match self.policy {
            PollErrorPolicy::GiveUpAfter(limit) if self.consecutive_errors >= limit.max(1) => {
                self.active_poll = None;
                self.phase = RunPhase::Failed;
                self.logs.push(format!(
                    "Error: lost contact with backend after {} failed status checks.",
                    self.consecutive_errors
                ));
                (vec![Effect::StopPolling { generation }], true)
            }
            _ => (Vec::new(), false),
        }
    }
}
