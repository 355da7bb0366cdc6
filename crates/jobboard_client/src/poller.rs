//! Single-owner status poller.
//!
//! At most one poll loop exists per [`StatusPoller`]. Starting a new generation
//! cancels the previous loop first; requests that were already in flight for a
//! cancelled generation are dropped instead of being delivered.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use board_logging::{board_debug, board_trace};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{Backend, BackendEvent, EventSink, Generation};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

struct ActivePoll {
    generation: Generation,
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

pub struct StatusPoller {
    interval: Duration,
    active: Option<ActivePoll>,
    live_loops: Arc<AtomicUsize>,
}

impl StatusPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            active: None,
            live_loops: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Cancels any running loop, then polls for `generation`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        &mut self,
        generation: Generation,
        backend: Arc<dyn Backend>,
        sink: Arc<dyn EventSink>,
    ) {
        self.cancel_active();

        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(
            generation,
            self.interval,
            backend,
            sink,
            cancel.clone(),
            LiveLoop::enter(self.live_loops.clone()),
        ));
        board_debug!("Polling generation {} every {:?}", generation, self.interval);
        self.active = Some(ActivePoll {
            generation,
            cancel,
            _task: task,
        });
    }

    /// Cancels the loop for `generation`. Returns `false` if it was not the active one.
    pub fn stop(&mut self, generation: Generation) -> bool {
        if self.active_generation() != Some(generation) {
            return false;
        }
        self.cancel_active();
        true
    }

    pub fn shutdown(&mut self) {
        self.cancel_active();
    }

    pub fn active_generation(&self) -> Option<Generation> {
        self.active.as_ref().map(|active| active.generation)
    }

    /// Number of poll loops that have not exited yet. Cancellation is observed
    /// at the loop's next scheduling point, so this can briefly lag `stop`.
    pub fn live_loops(&self) -> usize {
        self.live_loops.load(Ordering::SeqCst)
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            board_debug!("Cancelling poll generation {}", active.generation);
            active.cancel.cancel();
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

/// Counts a running loop for as long as it lives.
struct LiveLoop(Arc<AtomicUsize>);

impl LiveLoop {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LiveLoop {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn poll_loop(
    generation: Generation,
    period: Duration,
    backend: Arc<dyn Backend>,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
    _live: LiveLoop,
) {
    // Fixed cadence; ticks do not wait for the previous request to finish.
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let backend = backend.clone();
                let sink = sink.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    let result = backend.scrape_status().await;
                    if cancel.is_cancelled() {
                        board_trace!("Dropping status for cancelled generation {}", generation);
                        return;
                    }
                    sink.emit(BackendEvent::StatusPolled { generation, result });
                });
            }
        }
    }
}
