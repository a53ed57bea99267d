//! Synthetic interaction traffic through a live coordinator

use ackwatch_middleware::prelude::*;
use ackwatch_watchdog::prelude::*;
use clap::Args;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};

use crate::commands::PolicyArgs;
use crate::commands::policy::load_policy;
use crate::error::CliError;
use crate::output;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of interactions to dispatch
    #[arg(long, default_value_t = 20)]
    pub count: usize,

    /// Fraction of interactions that get acknowledged (0.0 to 1.0)
    #[arg(long, default_value_t = 0.8)]
    pub ack_ratio: f64,

    /// Upper bound of the random acknowledgment delay (milliseconds)
    #[arg(long, default_value_t = 6000)]
    pub max_ack_delay_ms: u64,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Result of one simulation run.
#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub dispatched: usize,
    pub acks_scheduled: usize,
    pub stats: CoordinatorStats,
    pub timeouts: Vec<String>,
}

/// Shared state seen by every handler of the simulated chain.
#[derive(Debug, Default)]
struct SimulationState {
    handled: AtomicUsize,
}

fn synthetic_interaction(index: usize, rng: &mut StdRng) -> Interaction {
    let token = format!("sim-{index:04}");
    let sender = rng.random_range(1000..2000);
    let channel = rng.random_range(1..10);
    let kind: InteractionKind = match index % 6 {
        0 => CommandData {
            name: "status".into(),
            target_id: None,
            options: vec![CommandOption::new(
                "verbose",
                rng.random_bool(0.5).to_string(),
            )],
        }
        .into(),
        1 => ButtonData {
            custom_id: format!("confirm-{}", rng.random_range(1..100)),
        }
        .into(),
        2 => StringSelectData {
            custom_id: "colour".into(),
            values: vec!["red".into(), "green".into()],
        }
        .into(),
        3 => ModalData {
            custom_id: "feedback".into(),
            fields: vec![("subject".into(), "hello".into())],
        }
        .into(),
        4 => AutocompleteData {
            command: "search".into(),
            focused_option: "query".into(),
            partial: "ru".into(),
        }
        .into(),
        _ => PingData.into(),
    };
    Interaction::new(token, sender, channel, kind)
}

pub async fn execute(args: &SimulateArgs, json: bool) -> Result<(), CliError> {
    if !(0.0..=1.0).contains(&args.ack_ratio) {
        return Err(CliError::InvalidArgument(format!(
            "--ack-ratio must be between 0 and 1, got {}",
            args.ack_ratio
        )));
    }
    let policy = load_policy(&args.policy)?;
    let summary = run(args, policy).await?;
    output::print_simulation(&summary, json)
}

pub async fn run(args: &SimulateArgs, policy: TimeoutPolicy) -> Result<SimulationSummary, CliError> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let timeouts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&timeouts);
    let mut coordinator = WatchdogCoordinator::new(policy, move |report: &TimeoutReport| {
        warn!(token = report.token(), elapsed = ?report.elapsed, "interaction timed out");
        sink.lock().push(report.to_string());
    })?;
    let detector = TimeoutDetectionHandler::new(coordinator.start()?);

    let chain = HandlerChain::new()
        .with(detector.clone())
        .with(FnHandler::new(
            "respond",
            |_: &Interaction, state: &SimulationState| {
                state.handled.fetch_add(1, Ordering::Relaxed);
                Ok(Flow::Continue)
            },
        ));
    let state = SimulationState::default();

    info!(count = args.count, ack_ratio = args.ack_ratio, "starting simulation");

    let mut acks = Vec::new();
    for index in 0..args.count {
        let interaction = synthetic_interaction(index, &mut rng);
        chain.dispatch(&interaction, &state).await?;

        if rng.random_bool(args.ack_ratio) {
            let delay = Duration::from_millis(rng.random_range(0..=args.max_ack_delay_ms));
            let detector = detector.clone();
            let token = interaction.token;
            acks.push(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                detector.acknowledge(token).await
            }));
        }
    }

    let acks_scheduled = acks.len();
    for ack in acks {
        match ack.await {
            Ok(result) => result?,
            Err(err) => warn!(%err, "acknowledgment task failed"),
        }
    }

    let stats = coordinator.stop(ShutdownMode::Drain).await?;
    let timeouts = std::mem::take(&mut *timeouts.lock());

    Ok(SimulationSummary {
        dispatched: state.handled.load(Ordering::Relaxed),
        acks_scheduled,
        stats,
        timeouts,
    })
}
