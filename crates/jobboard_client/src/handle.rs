use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use board_logging::{board_debug, board_info};

use crate::{Backend, BackendEvent, Debouncer, EventSink, Generation, StatusPoller};

enum BackendCommand {
    LoadJobs,
    LoadStats,
    MarkViewed { url: String },
    StartScrape,
    StartPolling { generation: Generation },
    StopPolling { generation: Generation },
    ScheduleSearch { token: u64, delay: Duration },
    Shutdown,
}

/// Runs backend calls and timers on a dedicated runtime thread.
///
/// Commands are processed in order on that thread, so poller and debouncer
/// bookkeeping never races; the network calls themselves run concurrently.
pub struct BackendHandle {
    cmd_tx: mpsc::Sender<BackendCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl BackendHandle {
    pub fn new(
        backend: Arc<dyn Backend>,
        poll_interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let worker = thread::Builder::new()
            .name("jobboard-backend".to_string())
            .spawn(move || {
                let enter_guard = runtime.enter();
                let mut poller = StatusPoller::new(poll_interval);
                let mut debouncer = Debouncer::new();

                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        BackendCommand::Shutdown => break,
                        BackendCommand::StartPolling { generation } => {
                            poller.start(generation, backend.clone(), sink.clone());
                        }
                        BackendCommand::StopPolling { generation } => {
                            if !poller.stop(generation) {
                                board_debug!("Stop for inactive poll generation {}", generation);
                            }
                        }
                        BackendCommand::ScheduleSearch { token, delay } => {
                            debouncer.schedule(token, delay, sink.clone());
                        }
                        other => {
                            runtime.spawn(run_call(backend.clone(), sink.clone(), other));
                        }
                    }
                }

                poller.shutdown();
                debouncer.cancel();
                drop(enter_guard);
                runtime.shutdown_timeout(Duration::from_secs(1));
                board_info!("Backend worker stopped");
            })?;

        Ok(Self {
            cmd_tx,
            worker: Some(worker),
        })
    }

    pub fn load_jobs(&self) {
        self.send(BackendCommand::LoadJobs);
    }

    pub fn load_stats(&self) {
        self.send(BackendCommand::LoadStats);
    }

    pub fn mark_viewed(&self, url: impl Into<String>) {
        self.send(BackendCommand::MarkViewed { url: url.into() });
    }

    pub fn start_scrape(&self) {
        self.send(BackendCommand::StartScrape);
    }

    pub fn start_polling(&self, generation: Generation) {
        self.send(BackendCommand::StartPolling { generation });
    }

    pub fn stop_polling(&self, generation: Generation) {
        self.send(BackendCommand::StopPolling { generation });
    }

    pub fn schedule_search(&self, token: u64, delay: Duration) {
        self.send(BackendCommand::ScheduleSearch { token, delay });
    }

    /// Stops timers and waits for the worker thread to exit.
    pub fn shutdown(mut self) {
        self.stop_worker();
    }

    fn send(&self, command: BackendCommand) {
        let _ = self.cmd_tx.send(command);
    }

    fn stop_worker(&mut self) {
        self.send(BackendCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for BackendHandle {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

async fn run_call(backend: Arc<dyn Backend>, sink: Arc<dyn EventSink>, command: BackendCommand) {
    let event = match command {
        BackendCommand::LoadJobs => BackendEvent::JobsLoaded(backend.matching_jobs().await),
        BackendCommand::LoadStats => BackendEvent::StatsLoaded(backend.stats().await),
        BackendCommand::MarkViewed { url } => {
            let result = backend.mark_viewed(&url).await;
            BackendEvent::ViewedMarked { url, result }
        }
        BackendCommand::StartScrape => {
            BackendEvent::ScrapeStarted(backend.start_full_scrape().await)
        }
        BackendCommand::StartPolling { .. }
        | BackendCommand::StopPolling { .. }
        | BackendCommand::ScheduleSearch { .. }
        | BackendCommand::Shutdown => return,
    };
    sink.emit(event);
}
