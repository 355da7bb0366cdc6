use std::sync::mpsc;

use board_logging::{board_debug, board_info, board_warn};
use jobboard_client::{
    BackendError, BackendEvent, BackendHandle, EventSink, MatchingJobRecord, ScrapeStatusRecord,
    StartResponse, StatsRecord,
};
use jobboard_core::{
    Effect, JobStatus, MatchingJob, Msg, RunSnapshot, StartReply, StatsSnapshot, TransportFailure,
};

use super::app::LoopEvent;

/// Executes core effects against the backend worker.
pub struct EffectRunner {
    backend: BackendHandle,
}

impl EffectRunner {
    pub fn new(backend: BackendHandle) -> Self {
        Self { backend }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            board_debug!("Effect {:?}", effect);
            match effect {
                Effect::LoadJobs => self.backend.load_jobs(),
                Effect::LoadStats => self.backend.load_stats(),
                Effect::PersistViewed { url } => self.backend.mark_viewed(url),
                Effect::StartScrape => {
                    board_info!("Requesting full scrape");
                    self.backend.start_scrape();
                }
                Effect::StartPolling { generation } => self.backend.start_polling(generation),
                Effect::StopPolling { generation } => self.backend.stop_polling(generation),
                Effect::ScheduleSearch { token, delay } => {
                    self.backend.schedule_search(token, delay)
                }
            }
        }
    }

    pub fn shutdown(self) {
        self.backend.shutdown();
    }
}

/// Feeds backend results into the event loop as core messages.
pub struct MsgSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl MsgSink {
    pub fn new(tx: mpsc::Sender<LoopEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: BackendEvent) {
        if self.tx.send(LoopEvent::Msg(to_msg(event))).is_err() {
            board_debug!("Event loop gone; dropping backend event");
        }
    }
}

pub fn to_msg(event: BackendEvent) -> Msg {
    match event {
        BackendEvent::JobsLoaded(result) => Msg::JobsLoaded(
            result
                .map(|records| records.into_iter().map(to_job).collect())
                .map_err(failure),
        ),
        BackendEvent::StatsLoaded(result) => Msg::StatsLoaded(result.map(to_stats).map_err(failure)),
        BackendEvent::ViewedMarked { url, result } => Msg::ViewedPersisted {
            url,
            result: result.map_err(failure),
        },
        BackendEvent::ScrapeStarted(result) => {
            Msg::ScrapeStartFinished(result.map(to_start_reply).map_err(failure))
        }
        BackendEvent::StatusPolled { generation, result } => Msg::ScrapeStatusReceived {
            generation,
            result: result.map(to_run_snapshot).map_err(failure),
        },
        BackendEvent::DebounceElapsed { token } => Msg::SearchDebounceElapsed { token },
    }
}

fn to_job(record: MatchingJobRecord) -> MatchingJob {
    let score = if record.score.is_finite() {
        record.score.clamp(0.0, 1.0)
    } else {
        board_warn!("Non-finite score for {}; showing 0", record.url);
        0.0
    };
    MatchingJob {
        status: JobStatus::from_wire(&record.status),
        url: record.url,
        title: record.title,
        description: record.description.filter(|text| !text.trim().is_empty()),
        score,
        matched_at: record.matched_at,
        is_new: record.is_new,
    }
}

fn to_stats(record: StatsRecord) -> StatsSnapshot {
    StatsSnapshot {
        total_urls: record.total_urls,
        total_details: record.total_details,
        seen_count: record.seen_count,
        sites: record.sites,
    }
}

fn to_start_reply(response: StartResponse) -> StartReply {
    StartReply {
        success: response.success,
        message: response.message,
    }
}

fn to_run_snapshot(record: ScrapeStatusRecord) -> RunSnapshot {
    RunSnapshot {
        running: record.running,
        message: record.message,
        logs: record.logs,
    }
}

fn failure(err: BackendError) -> TransportFailure {
    board_warn!("Backend call failed: {}", err);
    TransportFailure::new(err.to_string())
}
