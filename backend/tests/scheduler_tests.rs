//! Startup retry, steady-state refresh and publish behavior of the
//! scheduler, run on tokio's paused clock.

mod support;

use std::sync::Arc;
use std::time::Duration;

use launch_board::refresh::{
    snapshot_store, RefreshError, RefreshPolicy, RefreshScheduler, SchedulerState, StartupError,
};
use launch_board::services::MarkerMapBuilder;
use launch_board::source::SourceError;
use tokio::time::Instant;

use support::{daily_launches, epoch, raw_launch, FixedClock, ScriptedSource};

fn scheduler(source: Arc<ScriptedSource>, policy: RefreshPolicy) -> RefreshScheduler {
    let (writer, _reader) = snapshot_store();
    RefreshScheduler::new(source, Arc::new(MarkerMapBuilder::default()), writer, policy)
        .with_clock(Arc::new(FixedClock::at(epoch())))
}

#[tokio::test(start_paused = true)]
async fn test_startup_succeeds_on_last_attempt() {
    let source = Arc::new(ScriptedSource::failing_first(4, daily_launches(3)));
    let scheduler = scheduler(Arc::clone(&source), RefreshPolicy::default());
    let monitor = scheduler.monitor();
    let reader = scheduler.reader();

    let started = Instant::now();
    let ready = scheduler.initialize().await;

    assert!(ready.is_ok());
    assert_eq!(source.calls(), 5);
    // Four constant 5 s backoffs between five attempts.
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(20) && waited < Duration::from_secs(21));
    assert_eq!(monitor.state(), SchedulerState::Ready);
    assert_eq!(monitor.stats().startup_attempts, 5);
    assert_eq!(monitor.stats().startup_failures, 4);
    assert_eq!(monitor.stats().failed_refreshes, 0);
    assert_eq!(monitor.stats().consecutive_failures, 0);

    let snapshot = reader.current().unwrap();
    assert_eq!(snapshot.generation(), 1);
    assert_eq!(snapshot.launches().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_startup_gives_up_after_budget() {
    let source = Arc::new(ScriptedSource::failing());
    let scheduler = scheduler(Arc::clone(&source), RefreshPolicy::default());
    let monitor = scheduler.monitor();
    let reader = scheduler.reader();

    let result = scheduler.initialize().await;

    match result {
        Err(StartupError::RetriesExhausted { attempts, last }) => {
            assert_eq!(attempts, 5);
            assert!(matches!(last, RefreshError::Source(SourceError::Transport(_))));
        }
        Err(other) => panic!("unexpected startup error: {other}"),
        Ok(_) => panic!("startup should fail"),
    }
    assert_eq!(source.calls(), 5);
    assert_eq!(monitor.state(), SchedulerState::Failed { attempts: 5 });
    let stats = monitor.stats();
    assert_eq!(stats.startup_attempts, 5);
    assert_eq!(stats.startup_failures, 5);
    assert_eq!(stats.failed_refreshes, 0);
    assert!(stats.last_error.unwrap().contains("connection refused"));
    assert!(reader.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_zero_attempt_budget() {
    let source = Arc::new(ScriptedSource::succeeding(daily_launches(1)));
    let mut policy = RefreshPolicy::default();
    policy.retry.max_attempts = 0;

    let result = scheduler(Arc::clone(&source), policy).initialize().await;

    assert!(matches!(result, Err(StartupError::NoAttempts)));
    assert_eq!(source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_fetch_times_out() {
    let source = Arc::new(ScriptedSource::hanging());
    let mut policy = RefreshPolicy::default();
    policy.retry.max_attempts = 1;

    let started = Instant::now();
    let result = scheduler(source, policy).initialize().await;

    match result {
        Err(StartupError::RetriesExhausted { last, .. }) => {
            assert!(matches!(last, RefreshError::Source(SourceError::Timeout(_))));
        }
        _ => panic!("expected a timed-out startup"),
    }
    let waited = started.elapsed();
    assert!(waited >= policy.fetch_timeout && waited < policy.fetch_timeout + Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let source = Arc::new(ScriptedSource::succeeding(daily_launches(2)));
    let ready = scheduler(Arc::clone(&source), RefreshPolicy::default())
        .initialize()
        .await
        .unwrap();
    let reader = ready.reader();
    let before = reader.current().unwrap();

    source.set_fallback(None);
    assert!(ready.tick().await.is_none());

    let after = reader.current().unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    let stats = ready.monitor().stats();
    assert_eq!(stats.failed_refreshes, 1);
    assert_eq!(stats.consecutive_failures, 1);
    assert!(stats.last_error.unwrap().contains("connection refused"));
    assert_eq!(ready.monitor().state(), SchedulerState::Ready);

    source.set_fallback(Some(daily_launches(4)));
    let published = ready.tick().await.unwrap();
    assert_eq!(published.generation(), 2);
    assert_eq!(reader.current().unwrap().launches().len(), 4);
    assert_eq!(ready.monitor().stats().consecutive_failures, 0);
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_refresh_is_counted() {
    let source = Arc::new(ScriptedSource::succeeding(daily_launches(2)));
    let ready = scheduler(source, RefreshPolicy::default())
        .initialize()
        .await
        .unwrap();

    let second = ready.tick().await.unwrap();

    assert_eq!(second.generation(), 2);
    let stats = ready.monitor().stats();
    assert_eq!(stats.successful_refreshes, 2);
    assert_eq!(stats.unchanged_refreshes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_loop_refreshes_every_interval() {
    let source = Arc::new(ScriptedSource::succeeding(daily_launches(2)));
    let ready = scheduler(Arc::clone(&source), RefreshPolicy::default())
        .initialize()
        .await
        .unwrap();
    let reader = ready.reader();
    let handle = ready.spawn();

    tokio::time::sleep(Duration::from_secs(299)).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(reader.generation(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(reader.generation(), 2);

    // A failing cycle does not stop the loop.
    source.set_fallback(None);
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(source.calls(), 3);
    assert_eq!(reader.generation(), 2);

    source.set_fallback(Some(daily_launches(1)));
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(source.calls(), 4);
    assert_eq!(reader.generation(), 3);

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn test_interval_measured_from_end_of_cycle() {
    let source = Arc::new(
        ScriptedSource::succeeding(daily_launches(2)).with_latency(Duration::from_secs(20)),
    );
    let started = Instant::now();
    let ready = scheduler(Arc::clone(&source), RefreshPolicy::default())
        .initialize()
        .await
        .unwrap();
    let reader = ready.reader();
    // First fetch ran 0..20 s; the loop starts at 20 s.
    let handle = ready.spawn();

    // Second fetch starts at 20 + 300 = 320 s and ends at 340 s.
    tokio::time::sleep_until(started + Duration::from_secs(330)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(reader.generation(), 1);

    // Start-to-start ticking would fetch again at 620 s; end-to-start waits
    // until 340 + 300 = 640 s.
    tokio::time::sleep_until(started + Duration::from_secs(635)).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(reader.generation(), 2);

    tokio::time::sleep_until(started + Duration::from_secs(645)).await;
    assert_eq!(source.calls(), 3);

    tokio::time::sleep_until(started + Duration::from_secs(665)).await;
    assert_eq!(reader.generation(), 3);

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_truncated_to_display_limit() {
    let source = Arc::new(ScriptedSource::succeeding(daily_launches(12)));
    let ready = scheduler(source, RefreshPolicy::default())
        .initialize()
        .await
        .unwrap();

    let snapshot = ready.reader().current().unwrap();
    assert_eq!(snapshot.launches().len(), 8);
    assert_eq!(snapshot.map().marker_count(), 8);
    assert_eq!(snapshot.launches().first().unwrap().id, "launch-1");
}

#[tokio::test(start_paused = true)]
async fn test_published_snapshot_respects_window_and_order() {
    let records = vec![
        raw_launch("late", "2024-01-20T00:00:00Z"),
        raw_launch("beyond", "2024-03-01T00:00:00Z"),
        raw_launch("early", "2024-01-05T00:00:00Z"),
        raw_launch("broken", "soon"),
    ];
    let source = Arc::new(ScriptedSource::succeeding(records));
    let ready = scheduler(source, RefreshPolicy::default())
        .initialize()
        .await
        .unwrap();

    let snapshot = ready.reader().current().unwrap();
    let ids: Vec<&str> = snapshot.launches().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["early", "late"]);

    let markers: Vec<&str> = snapshot.map().markers.iter().map(|m| m.launch_id.as_str()).collect();
    assert_eq!(markers, ids);
    assert_eq!(snapshot.map().next_marker().unwrap().launch_id, "early");
    assert_eq!(snapshot.generated_at(), epoch());
}
