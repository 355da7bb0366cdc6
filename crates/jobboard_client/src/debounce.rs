use std::sync::Arc;
use std::time::Duration;

use board_logging::board_trace;
use tokio_util::sync::CancellationToken;

use crate::{BackendEvent, EventSink};

/// Keeps at most one pending search timer.
#[derive(Default)]
pub struct Debouncer {
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `DebounceElapsed { token }` after `delay` unless superseded first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, token: u64, delay: Duration, sink: Arc<dyn EventSink>) {
        self.cancel();

        let cancel = CancellationToken::new();
        let guard = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {
                    board_trace!("Search timer {} superseded", token);
                }
                _ = tokio::time::sleep(delay) => {
                    sink.emit(BackendEvent::DebounceElapsed { token });
                }
            }
        });
        self.pending = Some(cancel);
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
    }
}
