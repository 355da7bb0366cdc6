mod support;

use jobboard_core::{update, Badge, Effect, JobStatus, Msg, TransportFailure, NO_DESCRIPTION};
use support::{init_logging, job, jobs_on, loaded, send};

#[test]
fn opening_a_job_marks_it_viewed_before_rendering_detail() {
    init_logging();
    let state = loaded(vec![job("https://a.com/1", "Engineer A", 0.92)]);
    assert_eq!(state.view().rows[0].badge, Badge::NewMatch);

    let (state, effects) = update(
        state,
        Msg::OpenJob {
            url: "https://a.com/1".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::PersistViewed {
            url: "https://a.com/1".to_string()
        }]
    );
    let view = state.view();
    let detail = view.detail.expect("detail open");
    assert_eq!(detail.badge, Badge::Viewed);
    assert_eq!(detail.title, "Engineer A");
    assert_eq!(detail.site, "a");
    assert_eq!(view.rows[0].badge, Badge::Viewed);

    let stored = state.store().find("https://a.com/1").unwrap();
    assert_eq!(stored.status, JobStatus::Viewed);
    assert!(!stored.is_new);
}

#[test]
fn reopening_a_viewed_job_emits_nothing() {
    init_logging();
    let state = loaded(vec![job("https://a.com/1", "Engineer A", 0.92)]);
    let url = "https://a.com/1".to_string();
    let state = send(state, Msg::OpenJob { url: url.clone() });
    let state = send(state, Msg::CloseJob);
    let store_after_first = state.store().clone();

    let (state, effects) = update(state, Msg::OpenJob { url });
    assert!(effects.is_empty());
    assert_eq!(state.store(), &store_after_first);
    assert!(state.view().detail.is_some());
}

#[test]
fn opening_an_unknown_job_is_ignored() {
    init_logging();
    let mut state = loaded(vec![job("https://a.com/1", "Engineer A", 0.92)]);
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::OpenJob {
            url: "https://evicted.com/2".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert!(state.view().detail.is_none());
}

#[test]
fn viewing_keeps_the_current_page() {
    init_logging();
    let state = send(loaded(jobs_on(&["acme"], 45)), Msg::PageRequested(2));
    let url = state.view().rows[3].url.clone();

    let state = send(state, Msg::OpenJob { url });
    assert_eq!(state.view().pagination.page, 2);
}

#[test]
fn reload_that_evicts_the_selected_job_closes_detail() {
    init_logging();
    let state = loaded(vec![
        job("https://a.com/1", "Engineer A", 0.9),
        job("https://b.com/2", "Engineer B", 0.8),
    ]);
    let state = send(
        state,
        Msg::OpenJob {
            url: "https://a.com/1".to_string(),
        },
    );

    let state = send(
        state,
        Msg::JobsLoaded(Ok(vec![job("https://b.com/2", "Engineer B", 0.8)])),
    );
    assert!(state.view().detail.is_none());
    assert_eq!(state.selected(), None);
}

#[test]
fn failed_persist_keeps_local_viewed_state() {
    init_logging();
    let url = "https://a.com/1".to_string();
    let state = loaded(vec![job(&url, "Engineer A", 0.92)]);
    let state = send(state, Msg::OpenJob { url: url.clone() });

    let (state, effects) = update(
        state,
        Msg::ViewedPersisted {
            url: url.clone(),
            result: Err(TransportFailure::new("500 Internal Server Error")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.store().find(&url).unwrap().status, JobStatus::Viewed);
}

#[test]
fn missing_description_gets_a_fallback() {
    init_logging();
    let mut bare = job("https://a.com/1", "Engineer A", 0.92);
    bare.description = Some("   ".to_string());
    let state = send(
        loaded(vec![bare]),
        Msg::OpenJob {
            url: "https://a.com/1".to_string(),
        },
    );
    assert_eq!(state.view().detail.unwrap().description, NO_DESCRIPTION);
}

#[test]
fn dismiss_closes_detail_and_log_panel() {
    init_logging();
    let state = loaded(vec![job("https://a.com/1", "Engineer A", 0.92)]);
    let state = send(state, Msg::StartScrapeClicked);
    let state = send(
        state,
        Msg::OpenJob {
            url: "https://a.com/1".to_string(),
        },
    );
    assert!(state.view().run.log_visible);

    let (mut state, _) = update(state, Msg::DismissOverlays);
    assert!(state.consume_dirty());
    let view = state.view();
    assert!(view.detail.is_none());
    assert!(!view.run.log_visible);
}

#[test]
fn badge_prefers_viewed_over_new_flag() {
    init_logging();
    let mut viewed_but_new = job("https://a.com/1", "A", 0.5);
    viewed_but_new.status = JobStatus::Viewed;
    let mut old_match = job("https://b.com/2", "B", 0.5);
    old_match.is_new = false;
    let state = loaded(vec![viewed_but_new, old_match]);

    let badges: Vec<Badge> = state.view().rows.iter().map(|row| row.badge).collect();
    assert_eq!(badges, vec![Badge::Viewed, Badge::Match]);
}
