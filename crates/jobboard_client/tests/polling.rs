use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use jobboard_client::{
    Backend, BackendError, BackendEvent, BackendHandle, ChannelEventSink, Debouncer, EventSink,
    MatchingJobRecord, ScrapeStatusRecord, StartResponse, StatsRecord, StatusPoller,
};

/// Backend whose run log grows by one line per status call.
#[derive(Default)]
struct FakeBackend {
    status_calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Backend for FakeBackend {
    async fn matching_jobs(&self) -> Result<Vec<MatchingJobRecord>, BackendError> {
        Ok(vec![MatchingJobRecord {
            url: "https://a.com/1".to_string(),
            title: "Engineer A".to_string(),
            description: None,
            score: 0.92,
            matched_at: "2025-03-01T12:00:00".to_string(),
            status: "matched".to_string(),
            is_new: true,
        }])
    }

    async fn stats(&self) -> Result<StatsRecord, BackendError> {
        Ok(StatsRecord::default())
    }

    async fn mark_viewed(&self, _url: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn start_full_scrape(&self) -> Result<StartResponse, BackendError> {
        Ok(StartResponse {
            success: true,
            message: None,
        })
    }

    async fn scrape_status(&self) -> Result<ScrapeStatusRecord, BackendError> {
        let n = self.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ScrapeStatusRecord {
            running: true,
            logs: (0..n).map(|i| format!("line {i}")).collect(),
            ..ScrapeStatusRecord::default()
        })
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<BackendEvent>>,
}

impl RecordingSink {
    fn status_generations(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                BackendEvent::StatusPolled { generation, .. } => Some(*generation),
                _ => None,
            })
            .collect()
    }

    fn debounce_tokens(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                BackendEvent::DebounceElapsed { token } => Some(*token),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: BackendEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test]
async fn restarting_leaves_exactly_one_poll_loop() {
    let backend: Arc<dyn Backend> = Arc::new(FakeBackend::default());
    let sink = Arc::new(RecordingSink::default());
    let mut poller = StatusPoller::new(Duration::from_millis(10));

    poller.start(1, backend.clone(), sink.clone());
    poller.start(2, backend.clone(), sink.clone());
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(poller.active_generation(), Some(2));
    assert_eq!(poller.live_loops(), 1);
    let generations = sink.status_generations();
    assert!(!generations.is_empty());
    assert!(generations.iter().all(|g| *g == 2), "{generations:?}");

    assert!(poller.stop(2));
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(poller.live_loops(), 0);
    assert_eq!(poller.active_generation(), None);
}

#[tokio::test]
async fn stop_for_stale_generation_keeps_current_loop() {
    let backend: Arc<dyn Backend> = Arc::new(FakeBackend::default());
    let sink = Arc::new(RecordingSink::default());
    let mut poller = StatusPoller::new(Duration::from_millis(10));

    poller.start(3, backend.clone(), sink.clone());
    assert!(!poller.stop(2));
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(poller.live_loops(), 1);

    poller.shutdown();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(poller.live_loops(), 0);
}

#[tokio::test]
async fn first_tick_waits_one_interval() {
    let backend: Arc<dyn Backend> = Arc::new(FakeBackend::default());
    let sink = Arc::new(RecordingSink::default());
    let mut poller = StatusPoller::new(Duration::from_millis(200));

    poller.start(1, backend, sink.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sink.status_generations().is_empty());
    poller.shutdown();
}

#[tokio::test]
async fn debouncer_only_fires_last_token() {
    let sink = Arc::new(RecordingSink::default());
    let mut debouncer = Debouncer::new();

    for token in 1..=4 {
        debouncer.schedule(token, Duration::from_millis(40), sink.clone());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(sink.debounce_tokens(), vec![4]);
}

#[test]
fn handle_delivers_results_through_sink() {
    let (tx, rx) = mpsc::channel();
    let handle = BackendHandle::new(
        Arc::new(FakeBackend::default()),
        Duration::from_millis(10),
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("runtime");

    handle.load_jobs();
    let event = rx.recv_timeout(Duration::from_secs(2)).expect("jobs event");
    match event {
        BackendEvent::JobsLoaded(Ok(jobs)) => assert_eq!(jobs[0].url, "https://a.com/1"),
        other => panic!("unexpected event {other:?}"),
    }

    handle.mark_viewed("https://a.com/1");
    let event = rx.recv_timeout(Duration::from_secs(2)).expect("view event");
    assert_eq!(
        event,
        BackendEvent::ViewedMarked {
            url: "https://a.com/1".to_string(),
            result: Ok(()),
        }
    );

    handle.shutdown();
}

#[test]
fn handle_switches_polling_to_newest_generation() {
    let (tx, rx) = mpsc::channel();
    let handle = BackendHandle::new(
        Arc::new(FakeBackend::default()),
        Duration::from_millis(10),
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("runtime");

    handle.start_polling(1);
    handle.start_polling(2);
    std::thread::sleep(Duration::from_millis(80));
    handle.stop_polling(2);
    std::thread::sleep(Duration::from_millis(30));

    let generations: Vec<u64> = rx
        .try_iter()
        .filter_map(|event| match event {
            BackendEvent::StatusPolled { generation, .. } => Some(generation),
            _ => None,
        })
        .collect();
    assert!(!generations.is_empty());
    assert!(generations.iter().all(|g| *g == 2), "{generations:?}");

    // Nothing arrives once the poller is stopped.
    std::thread::sleep(Duration::from_millis(40));
    assert_eq!(rx.try_iter().count(), 0);

    handle.shutdown();
}
