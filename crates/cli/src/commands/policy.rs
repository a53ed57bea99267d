//! Effective policy resolution

use ackwatch_watchdog::policy::{DEFAULT_DEADLINE, DEFAULT_ORPHAN_ACK_TTL};
use ackwatch_watchdog::{TimeoutPolicy, WatchdogError};
use std::fs;
use std::time::Duration;
use tracing::debug;

use crate::commands::PolicyArgs;
use crate::error::CliError;
use crate::output;

/// Build the effective policy: defaults, then the file, then overrides.
///
/// A deadline override without a TTL override raises a TTL that would fall
/// below the new deadline, keeping the default TTL-to-deadline ratio.
pub fn load_policy(args: &PolicyArgs) -> Result<TimeoutPolicy, CliError> {
    let mut policy = match &args.config {
        Some(path) => {
            debug!(path = %path.display(), "loading policy file");
            let content = fs::read_to_string(path)?;
            serde_json::from_str::<TimeoutPolicy>(&content)
                .map_err(|e| CliError::InvalidConfiguration(format!("{}: {e}", path.display())))?
        }
        None => TimeoutPolicy::default(),
    };

    if let Some(ms) = args.deadline_ms {
        policy.deadline = Duration::from_millis(ms);
    }
    match args.orphan_ack_ttl_ms {
        Some(ms) => policy.orphan_ack_ttl = Duration::from_millis(ms),
        None if args.deadline_ms.is_some() && policy.orphan_ack_ttl < policy.deadline => {
            let ratio = ttl_ratio();
            policy.orphan_ack_ttl = policy.deadline.saturating_mul(ratio);
            debug!(
                ttl = ?policy.orphan_ack_ttl,
                "raised orphan_ack_ttl to follow the deadline override"
            );
        }
        None => {}
    }
    if let Some(ms) = args.poll_ms {
        policy.poll_interval = Duration::from_millis(ms);
    }
    if let Some(capacity) = args.channel_capacity {
        policy.channel_capacity = capacity;
    }

    policy.validate().map_err(|err| match err {
        WatchdogError::InvalidConfiguration(reason) => CliError::InvalidConfiguration(reason),
        other => CliError::Watchdog(other),
    })?;
    Ok(policy)
}

fn ttl_ratio() -> u32 {
    let ratio = DEFAULT_ORPHAN_ACK_TTL.as_millis() / DEFAULT_DEADLINE.as_millis();
    u32::try_from(ratio).unwrap_or(1).max(1)
}

/// Print the effective policy.
pub fn execute(args: &PolicyArgs, json: bool) -> Result<(), CliError> {
    let policy = load_policy(args)?;
    output::print_policy(&policy, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn defaults_without_file() -> TestResult {
        let policy = load_policy(&PolicyArgs::default())?;
        assert_eq!(policy, TimeoutPolicy::default());
        Ok(())
    }

    #[test]
    fn overrides_apply_after_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{ "deadline": 3000, "channel_capacity": 16 }}"#)?;

        let args = PolicyArgs {
            config: Some(file.path().to_path_buf()),
            deadline_ms: Some(2000),
            poll_ms: Some(50),
            channel_capacity: None,
            orphan_ack_ttl_ms: None,
        };
        let policy = load_policy(&args)?;

        assert_eq!(policy.deadline, Duration::from_millis(2000));
        assert_eq!(policy.poll_interval, Duration::from_millis(50));
        assert_eq!(policy.channel_capacity, 16);
        Ok(())
    }

    #[test]
    fn long_deadline_raises_orphan_ttl() -> TestResult {
        let args = PolicyArgs {
            deadline_ms: Some(20_000),
            ..Default::default()
        };
        let policy = load_policy(&args)?;

        assert_eq!(policy.deadline, Duration::from_secs(20));
        assert_eq!(policy.orphan_ack_ttl, Duration::from_secs(80));
        Ok(())
    }

    #[test]
    fn explicit_orphan_ttl_wins() -> TestResult {
        let args = PolicyArgs {
            deadline_ms: Some(20_000),
            orphan_ack_ttl_ms: Some(30_000),
            ..Default::default()
        };
        let policy = load_policy(&args)?;
        assert_eq!(policy.orphan_ack_ttl, Duration::from_secs(30));

        let args = PolicyArgs {
            deadline_ms: Some(20_000),
            orphan_ack_ttl_ms: Some(1_000),
            ..Default::default()
        };
        assert!(matches!(
            load_policy(&args),
            Err(CliError::InvalidConfiguration(_))
        ));
        Ok(())
    }

    #[test]
    fn short_deadline_keeps_default_ttl() -> TestResult {
        let args = PolicyArgs {
            deadline_ms: Some(2_000),
            ..Default::default()
        };
        let policy = load_policy(&args)?;
        assert_eq!(policy.orphan_ack_ttl, DEFAULT_ORPHAN_ACK_TTL);
        Ok(())
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = PolicyArgs {
            poll_ms: Some(10_000),
            ..Default::default()
        };
        assert!(matches!(
            load_policy(&args),
            Err(CliError::InvalidConfiguration(_))
        ));
    }
}
