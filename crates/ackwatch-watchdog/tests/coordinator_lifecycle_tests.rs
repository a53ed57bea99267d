//! Coordinator lifecycle and timeout scenarios on a paused tokio clock.

use ackwatch_test_helpers::prelude::*;
use ackwatch_watchdog::prelude::*;
use std::time::Duration;

fn recording_coordinator(
    policy: TimeoutPolicy,
) -> Result<(WatchdogCoordinator, Recorder<(String, Duration)>), WatchdogError> {
    let recorder = Recorder::new();
    let sink = recorder.clone();
    let coordinator = WatchdogCoordinator::new(policy, move |report: &TimeoutReport| {
        sink.push((report.token().to_string(), report.elapsed));
    })?;
    Ok((coordinator, recorder))
}

fn tokens(reports: &[(String, Duration)]) -> Vec<&str> {
    reports.iter().map(|(token, _)| token.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_only_unacknowledged_items_are_reported() -> TestResult {
    let (mut coordinator, recorder) = recording_coordinator(TimeoutPolicy::default())?;
    let handle = coordinator.start()?;

    for token in ["A", "B", "C"] {
        handle.arrive(token).await?;
    }
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.submit_ack("B").await?;

    tokio::time::sleep(Duration::from_secs(4)).await;

    let reports = recorder.snapshot();
    assert_eq!(tokens(&reports), vec!["A", "C"]);
    for (_, elapsed) in &reports {
        assert_in_range!(*elapsed, Duration::from_secs(4)..=Duration::from_millis(4100));
    }
    assert_disjoint!(tokens(&reports), ["B"]);

    let stats = coordinator.stop(ShutdownMode::Drain).await?;
    assert_eq!(stats.arrivals, 3);
    assert_eq!(stats.acknowledgments, 1);
    assert_eq!(stats.acknowledged_in_time, 1);
    assert_eq!(stats.timeouts_reported, 2);
    assert_eq!(stats.pending, 0);
    assert_eq!(recorder.len(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_ack_before_arrival_is_honoured() -> TestResult {
    let (mut coordinator, recorder) = recording_coordinator(TimeoutPolicy::default())?;
    let handle = coordinator.start()?;

    handle.submit_ack("early").await?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.arrive("early").await?;

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(recorder.is_empty());

    let stats = coordinator.stats();
    assert_eq!(stats.acknowledged_in_time, 1);
    assert_eq!(stats.acknowledged_set_len, 0);

    coordinator.stop(ShutdownMode::Drain).await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_each_ack_retires_one_item_with_shared_token() -> TestResult {
    let (mut coordinator, recorder) = recording_coordinator(TimeoutPolicy::default())?;
    let handle = coordinator.start()?;

    handle.arrive("dup").await?;
    handle.arrive("dup").await?;
    handle.submit_ack("dup").await?;
    handle.submit_ack("dup").await?;

    tokio::time::sleep(Duration::from_secs(5)).await;
    let stats = coordinator.stop(ShutdownMode::Drain).await?;

    assert!(recorder.is_empty());
    assert_eq!(stats.acknowledgments, 2);
    assert_eq!(stats.acknowledged_in_time, 2);
    assert_eq!(stats.acknowledged_set_len, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_single_ack_retires_only_first_item_with_shared_token() -> TestResult {
    let (mut coordinator, recorder) = recording_coordinator(TimeoutPolicy::default())?;
    let handle = coordinator.start()?;

    handle.arrive("dup").await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.arrive("dup").await?;
    handle.submit_ack("dup").await?;

    tokio::time::sleep(Duration::from_secs(5)).await;
    let stats = coordinator.stop(ShutdownMode::Drain).await?;

    let reports = recorder.snapshot();
    assert_eq!(tokens(&reports), vec!["dup"]);
    let (_, elapsed) = must_some(reports.first(), "expected the second item to time out");
    assert_in_range!(*elapsed, Duration::from_secs(4)..=Duration::from_millis(4100));
    assert_eq!(stats.acknowledged_in_time, 1);
    assert_eq!(stats.timeouts_reported, 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_late_ack_becomes_orphan_and_expires() -> TestResult {
    let (mut coordinator, recorder) = recording_coordinator(TimeoutPolicy::default())?;
    let handle = coordinator.start()?;

    handle.arrive("late").await?;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(tokens(&recorder.snapshot()), vec!["late"]);

    handle.submit_ack("late").await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(coordinator.stats().acknowledged_set_len, 1);

    tokio::time::sleep(Duration::from_secs(17)).await;
    let stats = coordinator.stats();
    assert_eq!(stats.orphan_acks_expired, 1);
    assert_eq!(stats.acknowledged_set_len, 0);
    assert_eq!(stats.timeouts_reported, 1);

    coordinator.stop(ShutdownMode::Drain).await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drain_retires_every_accepted_item() -> TestResult {
    let (mut coordinator, recorder) = recording_coordinator(TimeoutPolicy::default())?;
    let handle = coordinator.start()?;

    for token in ["one", "two", "three"] {
        handle.arrive(token).await?;
    }
    handle.submit_ack("two").await?;

    let stats = coordinator.stop(ShutdownMode::Drain).await?;

    assert_eq!(tokens(&recorder.snapshot()), vec!["one", "three"]);
    assert_eq!(stats.retired(), 3);
    assert_eq!(stats.discarded, 0);
    assert_eq!(stats.pending, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_discard_drops_pending_items() -> TestResult {
    let (mut coordinator, recorder) = recording_coordinator(TimeoutPolicy::default())?;
    let handle = coordinator.start()?;

    for token in ["x", "y", "z"] {
        handle.arrive(token).await?;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;

    let stats = coordinator.stop(ShutdownMode::Discard).await?;
    assert_eq!(stats.discarded, 3);
    assert_eq!(stats.timeouts_reported, 0);
    assert_eq!(stats.pending, 0);
    assert!(recorder.is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_lifecycle_errors() -> TestResult {
    let (mut coordinator, _recorder) = recording_coordinator(TimeoutPolicy::default())?;

    assert_eq!(
        coordinator.stop(ShutdownMode::Drain).await.err(),
        Some(WatchdogError::NotRunning)
    );
    assert_eq!(coordinator.handle().err(), Some(WatchdogError::NotRunning));

    let handle = coordinator.start()?;
    assert!(coordinator.is_running());
    assert_eq!(coordinator.start().err(), Some(WatchdogError::AlreadyStarted));

    let second = coordinator.handle()?;
    second.arrive("via-second").await?;

    coordinator.stop(ShutdownMode::Discard).await?;
    assert!(!coordinator.is_running());
    assert!(handle.is_closed());
    assert_eq!(
        handle.arrive("after-stop").await.err(),
        Some(WatchdogError::stopped("after-stop"))
    );
    assert_eq!(
        handle.try_submit_ack("after-stop").err(),
        Some(WatchdogError::stopped("after-stop"))
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_loop_exits_when_handles_are_dropped() -> TestResult {
    let (mut coordinator, _recorder) = recording_coordinator(TimeoutPolicy::default())?;
    let handle = coordinator.start()?;
    drop(handle);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!coordinator.is_running());
    assert_eq!(coordinator.handle().err(), Some(WatchdogError::NotRunning));

    let stats = coordinator.stop(ShutdownMode::Drain).await?;
    assert_eq!(stats.arrivals, 0);
    Ok(())
}

#[tokio::test]
async fn test_try_submit_reports_full_channel() -> TestResult {
    let policy = TimeoutPolicy::builder().channel_capacity(1).build()?;
    let (mut coordinator, _recorder) = recording_coordinator(policy)?;
    let handle = coordinator.start()?;

    // Current-thread runtime: the loop has not run yet, so nothing is drained.
    handle.try_submit_arrival(WorkItem::new("first"))?;
    let err = handle
        .try_submit_arrival(WorkItem::new("second"))
        .err()
        .ok_or("expected a full channel")?;
    assert_eq!(err, WatchdogError::channel_full("second"));
    assert!(err.is_retryable());

    let stats = coordinator.stop(ShutdownMode::Discard).await?;
    assert_eq!(stats.discarded, 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_detail_is_carried_into_reports() -> TestResult {
    let recorder = Recorder::new();
    let sink = recorder.clone();
    let mut coordinator =
        WatchdogCoordinator::new(TimeoutPolicy::default(), move |report: &TimeoutReport| {
            sink.push(report.to_string());
        })?;
    let handle = coordinator.start()?;

    handle
        .submit_arrival(WorkItem::new("tok").with_detail("Ping | ping"))
        .await?;
    coordinator.stop(ShutdownMode::Drain).await?;

    let reports = recorder.snapshot();
    let report = must_some(reports.first(), "expected one report");
    assert!(report.starts_with("[Timeout] 4"));
    assert!(report.ends_with(" tok | Ping | ping"));
    Ok(())
}

#[test]
fn test_blocking_submission_from_plain_thread() -> TestResult {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let policy = TimeoutPolicy::builder()
        .deadline(Duration::from_millis(50))
        .poll_interval(Duration::from_millis(5))
        .orphan_ack_ttl(Duration::from_millis(500))
        .build()?;
    let (mut coordinator, recorder) = recording_coordinator(policy)?;
    let handle = runtime.block_on(async { coordinator.start() })?;

    let producer = std::thread::spawn(move || -> WatchdogResult<()> {
        handle.blocking_submit_arrival(WorkItem::new("acked"))?;
        handle.blocking_submit_ack("acked")?;
        handle.blocking_submit_arrival(WorkItem::new("missed"))?;
        Ok(())
    });
    producer.join().map_err(|_| "producer thread panicked")??;

    let stats = runtime.block_on(coordinator.stop(ShutdownMode::Drain))?;
    assert_eq!(stats.acknowledged_in_time, 1);
    assert_eq!(stats.timeouts_reported, 1);
    assert_eq!(tokens(&recorder.snapshot()), vec!["missed"]);
    Ok(())
}
