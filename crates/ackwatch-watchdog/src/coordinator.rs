//! Watchdog coordinator.
//!
//! The coordinator owns one background task. That task is the only owner of
//! the pending-item ring and the acknowledged set; producers reach it through
//! a [`WatchdogHandle`] that enqueues onto two bounded channels.
//!
//! Each loop iteration drains a bounded batch of signals, then inspects the
//! head of the ring. The ring is ordered by arrival, so the head is the oldest
//! pending item: if it is not due yet, nothing behind it is due either.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use ackwatch_ring::GrowableRingBuffer;
use tokio::sync::{
    broadcast,
    mpsc::{self, error::TryRecvError},
};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, trace, warn};

use crate::ack_set::AcknowledgedSet;
use crate::error::{WatchdogError, WatchdogResult};
use crate::handle::WatchdogHandle;
use crate::item::{TimeoutReport, WorkItem};
use crate::policy::TimeoutPolicy;
use crate::reporter::{Reporter, TracingReporter};
use crate::stats::{CoordinatorMetrics, CoordinatorStats};

/// What happens to pending items when the coordinator stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownMode {
    /// Stop intake, then keep retiring until the ring is empty. Every
    /// accepted item still gets exactly one outcome.
    #[default]
    Drain,
    /// Stop intake and drop every pending item without an outcome.
    Discard,
}

struct Running {
    arrivals: mpsc::WeakSender<WorkItem>,
    acks: mpsc::WeakSender<String>,
    shutdown: broadcast::Sender<ShutdownMode>,
    task: JoinHandle<()>,
}

/// Reports work items that are not acknowledged before the policy deadline.
///
/// # Example
///
/// ```rust
/// use ackwatch_watchdog::{ShutdownMode, TimeoutPolicy, TracingReporter, WatchdogCoordinator};
///
/// # async fn run() -> Result<(), ackwatch_watchdog::WatchdogError> {
/// let mut coordinator = WatchdogCoordinator::new(TimeoutPolicy::default(), TracingReporter)?;
/// let handle = coordinator.start()?;
///
/// handle.arrive("interaction-1").await?;
/// handle.submit_ack("interaction-1").await?;
///
/// let stats = coordinator.stop(ShutdownMode::Drain).await?;
/// assert_eq!(stats.acknowledged_in_time, 1);
/// # Ok(())
/// # }
/// ```
pub struct WatchdogCoordinator {
    policy: TimeoutPolicy,
    reporter: Arc<dyn Reporter>,
    metrics: Arc<CoordinatorMetrics>,
    running: Option<Running>,
}

impl WatchdogCoordinator {
    /// Create a stopped coordinator.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy is invalid.
    pub fn new(policy: TimeoutPolicy, reporter: impl Reporter + 'static) -> WatchdogResult<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            reporter: Arc::new(reporter),
            metrics: Arc::new(CoordinatorMetrics::new()),
            running: None,
        })
    }

    /// Create a stopped coordinator that logs timeouts through `tracing`.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy is invalid.
    pub fn with_tracing_reporter(policy: TimeoutPolicy) -> WatchdogResult<Self> {
        Self::new(policy, TracingReporter)
    }

    /// The policy this coordinator was built with.
    #[must_use]
    pub fn policy(&self) -> &TimeoutPolicy {
        &self.policy
    }

    /// Spawn the coordinator loop on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::AlreadyStarted`] if the coordinator is running,
    /// or [`WatchdogError::RuntimeUnavailable`] outside a tokio runtime.
    pub fn start(&mut self) -> WatchdogResult<WatchdogHandle> {
        if self.running.is_some() {
            return Err(WatchdogError::AlreadyStarted);
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return Err(WatchdogError::RuntimeUnavailable);
        };

        let capacity = self.policy.channel_capacity;
        let (arrivals_tx, arrivals_rx) = mpsc::channel(capacity);
        let (acks_tx, acks_rx) = mpsc::channel(capacity);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let event_loop = CoordinatorLoop {
            pending: GrowableRingBuffer::with_capacity(self.policy.initial_buffer_capacity),
            acknowledged: AcknowledgedSet::new(),
            policy: self.policy.clone(),
            reporter: Arc::clone(&self.reporter),
            metrics: Arc::clone(&self.metrics),
            arrivals: arrivals_rx,
            acks: acks_rx,
            arrivals_open: true,
            acks_open: true,
            shutdown: shutdown_rx,
            stopping: false,
            finished: false,
            last_sweep: Instant::now(),
        };

        let span = info_span!(
            "ackwatch_coordinator",
            deadline_ms = duration_ms(self.policy.deadline),
            channel_capacity = capacity
        );
        let task = runtime.spawn(event_loop.run().instrument(span));

        self.running = Some(Running {
            arrivals: arrivals_tx.downgrade(),
            acks: acks_tx.downgrade(),
            shutdown: shutdown_tx,
            task,
        });

        Ok(WatchdogHandle::new(arrivals_tx, acks_tx))
    }

    /// Get another submission handle for the running coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::NotRunning`] if the coordinator is stopped or
    /// its loop already exited.
    pub fn handle(&self) -> WatchdogResult<WatchdogHandle> {
        let running = self.running.as_ref().ok_or(WatchdogError::NotRunning)?;
        match (running.arrivals.upgrade(), running.acks.upgrade()) {
            (Some(arrivals), Some(acks)) => Ok(WatchdogHandle::new(arrivals, acks)),
            _ => Err(WatchdogError::NotRunning),
        }
    }

    /// Returns `true` while the coordinator loop is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    /// Current counter values.
    #[must_use]
    pub fn stats(&self) -> CoordinatorStats {
        self.metrics.snapshot()
    }

    /// Stop the coordinator loop and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::NotRunning`] if the coordinator was not
    /// started, or [`WatchdogError::TaskFailed`] if the loop task ended
    /// abnormally.
    pub async fn stop(&mut self, mode: ShutdownMode) -> WatchdogResult<CoordinatorStats> {
        let running = self.running.take().ok_or(WatchdogError::NotRunning)?;

        if running.shutdown.send(mode).is_err() {
            debug!("coordinator loop had already exited");
        }
        running
            .task
            .await
            .map_err(|err| WatchdogError::task_failed(err.to_string()))?;

        let stats = self.metrics.snapshot();
        info!(
            ?mode,
            timeouts_reported = stats.timeouts_reported,
            acknowledged_in_time = stats.acknowledged_in_time,
            discarded = stats.discarded,
            "watchdog coordinator stopped"
        );
        Ok(stats)
    }
}

impl Drop for WatchdogCoordinator {
    fn drop(&mut self) {
        if let Some(running) = self.running.take()
            && running.shutdown.send(ShutdownMode::Discard).is_err()
        {
            debug!("coordinator dropped after its loop exited");
        }
    }
}

impl std::fmt::Debug for WatchdogCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchdogCoordinator")
            .field("policy", &self.policy)
            .field("running", &self.is_running())
            .field("stats", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}

/// Outcome of one head inspection.
enum Head {
    Empty,
    Retired,
    Due(Duration),
}

struct CoordinatorLoop {
    policy: TimeoutPolicy,
    reporter: Arc<dyn Reporter>,
    metrics: Arc<CoordinatorMetrics>,
    pending: GrowableRingBuffer<WorkItem>,
    acknowledged: AcknowledgedSet,
    arrivals: mpsc::Receiver<WorkItem>,
    acks: mpsc::Receiver<String>,
    arrivals_open: bool,
    acks_open: bool,
    shutdown: broadcast::Receiver<ShutdownMode>,
    stopping: bool,
    finished: bool,
    last_sweep: Instant,
}

impl CoordinatorLoop {
    async fn run(mut self) {
        info!("watchdog coordinator started");

        loop {
            self.poll_shutdown();
            if self.finished {
                break;
            }
            self.drain_signals();

            match self.inspect_head(Instant::now()) {
                Head::Retired => {}
                Head::Empty => {
                    if !self.arrivals_open {
                        break;
                    }
                    self.maybe_sweep(Instant::now());
                    self.wait(self.policy.poll_interval).await;
                }
                Head::Due(remaining) => {
                    self.maybe_sweep(Instant::now());
                    self.wait(remaining.min(self.policy.poll_interval)).await;
                }
            }
        }

        info!(
            acknowledged_set_len = self.acknowledged.len(),
            "watchdog coordinator loop exited"
        );
    }

    fn poll_shutdown(&mut self) {
        if self.stopping {
            return;
        }
        match self.shutdown.try_recv() {
            Ok(mode) => self.begin_shutdown(mode),
            Err(broadcast::error::TryRecvError::Empty) => {}
            Err(_) => self.begin_shutdown(ShutdownMode::Discard),
        }
    }

    /// Absorb at most one channel's capacity of signals from each channel.
    fn drain_signals(&mut self) {
        let batch = self.policy.channel_capacity;
        let mut absorbed = 0usize;

        while self.arrivals_open && absorbed < batch {
            match self.arrivals.try_recv() {
                Ok(item) => {
                    self.absorb_arrival(item);
                    absorbed += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.arrivals_open = false,
            }
        }

        let mut acked = 0usize;
        while self.acks_open && acked < batch {
            match self.acks.try_recv() {
                Ok(token) => {
                    self.absorb_ack(token);
                    acked += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.acks_open = false,
            }
        }

        if absorbed > 0 || acked > 0 {
            trace!(arrivals = absorbed, acks = acked, "drained signals");
        }
    }

    fn absorb_arrival(&mut self, item: WorkItem) {
        self.pending.push(item);
        self.metrics.inc_arrivals();
        self.publish_gauges();
    }

    fn absorb_ack(&mut self, token: String) {
        self.acknowledged.record(token, Instant::now());
        self.metrics.inc_acknowledgments();
        self.publish_gauges();
    }

    fn inspect_head(&mut self, now: Instant) -> Head {
        let Some(head) = self.pending.peek() else {
            return Head::Empty;
        };

        if self.acknowledged.remove(head.token()) {
            if let Some(item) = self.pending.pop() {
                debug!(token = item.token(), "work item acknowledged in time");
            }
            self.metrics.inc_acknowledged_in_time();
            self.publish_gauges();
            return Head::Retired;
        }

        let elapsed = head.elapsed_at(now);
        if let Some(remaining) = self.policy.deadline.checked_sub(elapsed)
            && !remaining.is_zero()
        {
            return Head::Due(remaining);
        }

        if let Some(item) = self.pending.pop() {
            self.publish_gauges();
            self.report(&TimeoutReport { item, elapsed });
        }
        Head::Retired
    }

    fn report(&self, report: &TimeoutReport) {
        self.metrics.inc_timeouts_reported();
        let outcome = catch_unwind(AssertUnwindSafe(|| self.reporter.report(report)));
        if let Err(payload) = outcome {
            self.metrics.inc_reporter_failures();
            error!(
                token = report.token(),
                panic = panic_message(payload.as_ref()),
                "timeout reporter panicked; continuing"
            );
        }
    }

    /// Expire stale acknowledgments, at most once per poll interval.
    fn maybe_sweep(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_sweep) < self.policy.poll_interval {
            return;
        }
        self.last_sweep = now;
        if self.acknowledged.is_empty() {
            return;
        }

        let expired = self
            .acknowledged
            .expire_older_than(now, self.policy.orphan_ack_ttl);
        if expired > 0 {
            self.metrics.add_orphan_acks_expired(expired);
            self.publish_gauges();
            warn!(
                expired,
                ttl_ms = duration_ms(self.policy.orphan_ack_ttl),
                "expired acknowledgments that never matched an arrival"
            );
        }
    }

    /// Sleep up to `timeout`, waking early for a signal or a shutdown request.
    async fn wait(&mut self, timeout: Duration) {
        let stopping = self.stopping;
        let arrivals_open = self.arrivals_open;
        let acks_open = self.acks_open;

        tokio::select! {
            biased;
            signal = self.shutdown.recv(), if !stopping => {
                self.begin_shutdown(signal.unwrap_or(ShutdownMode::Discard));
            }
            item = self.arrivals.recv(), if arrivals_open => match item {
                Some(item) => self.absorb_arrival(item),
                None => self.arrivals_open = false,
            },
            token = self.acks.recv(), if acks_open => match token {
                Some(token) => self.absorb_ack(token),
                None => self.acks_open = false,
            },
            () = tokio::time::sleep(timeout) => {}
        }
    }

    fn begin_shutdown(&mut self, mode: ShutdownMode) {
        self.stopping = true;
        self.arrivals.close();
        self.acks.close();

        match mode {
            ShutdownMode::Drain => {
                info!(pending = self.pending.len(), "draining watchdog coordinator");
            }
            ShutdownMode::Discard => {
                let mut discarded = self.pending.len();
                while let Ok(_item) = self.arrivals.try_recv() {
                    discarded += 1;
                }
                while self.acks.try_recv().is_ok() {}

                self.pending.clear();
                self.acknowledged.clear();
                self.arrivals_open = false;
                self.acks_open = false;
                self.metrics.add_discarded(discarded);
                self.publish_gauges();
                self.finished = true;

                if discarded > 0 {
                    warn!(discarded, "discarded pending work items on shutdown");
                }
            }
        }
    }

    fn publish_gauges(&self) {
        self.metrics
            .set_gauges(self.pending.len(), self.acknowledged.len());
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
