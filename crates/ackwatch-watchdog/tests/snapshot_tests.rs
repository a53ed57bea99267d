//! Snapshot tests for user-facing text.

use ackwatch_watchdog::prelude::*;
use insta::assert_snapshot;
use std::time::Duration;

#[test]
fn snapshot_error_messages() {
    let rendered = [
        WatchdogError::invalid_configuration("deadline must be greater than 0"),
        WatchdogError::AlreadyStarted,
        WatchdogError::NotRunning,
        WatchdogError::RuntimeUnavailable,
        WatchdogError::stopped("tok-1"),
        WatchdogError::channel_full("tok-2"),
        WatchdogError::task_failed("task 7 panicked"),
    ]
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    assert_snapshot!(rendered, @r"
    Invalid configuration: deadline must be greater than 0
    Coordinator is already running
    Coordinator is not running
    No tokio runtime available to run the coordinator
    Coordinator stopped; signal for token 'tok-1' was not accepted
    Channel full; signal for token 'tok-2' was not accepted
    Coordinator task failed: task 7 panicked
    ");
}

#[test]
fn snapshot_timeout_report() {
    let report = TimeoutReport {
        item: WorkItem::new("1234").with_detail("Command | name=ping"),
        elapsed: Duration::from_millis(4250),
    };
    assert_snapshot!(report.to_string(), @"[Timeout] 4.25s 1234 | Command | name=ping");
}

#[test]
fn snapshot_default_policy_json() -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(&TimeoutPolicy::default())?;
    assert_snapshot!(json, @r#"
    {
      "deadline": 4000,
      "poll_interval": 100,
      "channel_capacity": 128,
      "initial_buffer_capacity": 64,
      "orphan_ack_ttl": 16000
    }
    "#);
    Ok(())
}
