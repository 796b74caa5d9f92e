//! Watchdog Supervisor Module
//!
//! Runs the DNS probe on a fixed cadence, keeps the health snapshot current
//! and stops every dependent device when a probe fails.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::snapshot::{HealthSnapshot, Readings};
use crate::core::config::WatchdogConfig;
use crate::core::error::{NetworkEstopError, Result};
use crate::device::{Dependencies, DependencySet, SweepReport};
use crate::probe::{DnsProbe, ProbeError};

/// Where the polling loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogState {
    /// Waiting for the next tick
    Idle,
    /// A probe is in flight
    Probing,
    /// Closed; no further cycles run
    Stopped,
}

/// Result of one poll cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Healthy { latency: Duration },
    Unhealthy { error: ProbeError, sweep: SweepReport },
}

impl CycleOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, CycleOutcome::Healthy { .. })
    }
}

struct Shared {
    name: String,
    server: String,
    lookup: String,
    interval: Duration,
    probe: DnsProbe,
    dependencies: DependencySet,
    snapshot: Mutex<HealthSnapshot>,
    state: Mutex<WatchdogState>,
}

impl Shared {
    fn state(&self) -> WatchdogState {
        *self.state.lock()
    }

    fn set_state(&self, next: WatchdogState) {
        let mut state = self.state.lock();
        if *state != WatchdogState::Stopped {
            *state = next;
        }
    }

    async fn poll_once(&self) -> CycleOutcome {
        self.set_state(WatchdogState::Probing);

        let started_at = Utc::now();
        let clock = Instant::now();
        let result = self.probe.probe(&self.server, &self.lookup).await;
        let elapsed = clock.elapsed();

        let recovered = {
            let mut snapshot = self.snapshot.lock();
            let was_failing = snapshot.last_error.is_some();
            match &result {
                Ok(_) => snapshot.record_success(started_at, elapsed),
                Err(e) => snapshot.record_failure(started_at, e.clone()),
            }
            was_failing && result.is_ok()
        };

        let outcome = match result {
            Ok(reply) => {
                let latency_ms = elapsed.as_millis() as u64;
                if recovered {
                    tracing::info!(component = %self.name, latency_ms, "resolver reachable again");
                } else {
                    tracing::debug!(
                        component = %self.name,
                        latency_ms,
                        rcode = %reply.response_code,
                        "DNS probe ok"
                    );
                }
                CycleOutcome::Healthy { latency: elapsed }
            }
            Err(error) => {
                tracing::warn!(
                    component = %self.name,
                    server = %self.server,
                    lookup = %self.lookup,
                    error = %error,
                    "DNS probe failed, stopping dependencies"
                );

                // The snapshot lock is released; device calls may be slow.
                let sweep = self.dependencies.stop_all().await;
                if !sweep.is_complete() {
                    tracing::warn!(
                        component = %self.name,
                        attempted = sweep.attempted,
                        failed = sweep.failed,
                        "stop sweep incomplete"
                    );
                } else {
                    tracing::info!(component = %self.name, attempted = sweep.attempted, "stop sweep complete");
                }
                CycleOutcome::Unhealthy { error, sweep }
            }
        };

        self.set_state(WatchdogState::Idle);
        outcome
    }
}

async fn run_loop(shared: Arc<Shared>, cancel: CancellationToken) {
    let period = shared.interval;
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        shared.poll_once().await;
    }

    shared.set_state(WatchdogState::Stopped);
    tracing::debug!(component = %shared.name, "polling loop exited");
}

/// DNS reachability watchdog
pub struct DnsWatchdog {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DnsWatchdog {
    /// Validate, bind dependencies and start polling.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        name: impl Into<String>,
        config: WatchdogConfig,
        dependencies: Dependencies,
    ) -> Result<Self> {
        let watchdog = Self::build(name, config, dependencies)?;
        watchdog.start()?;
        Ok(watchdog)
    }

    /// Construct without starting the polling loop
    pub(crate) fn build(
        name: impl Into<String>,
        config: WatchdogConfig,
        dependencies: Dependencies,
    ) -> Result<Self> {
        let name = name.into();
        let stop_targets = config.validate(&name)?;
        let dependencies = DependencySet::resolve(&stop_targets, dependencies)?;

        let shared = Shared {
            probe: DnsProbe::new(config.timeout()),
            interval: config.interval(),
            server: config.server,
            lookup: config.lookup,
            name,
            dependencies,
            snapshot: Mutex::new(HealthSnapshot::default()),
            state: Mutex::new(WatchdogState::Idle),
        };

        Ok(Self {
            shared: Arc::new(shared),
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
        })
    }

    fn start(&self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| NetworkEstopError::Runtime(e.to_string()))?;

        let task = runtime.spawn(run_loop(Arc::clone(&self.shared), self.cancel.clone()));
        *self.task.lock() = Some(task);

        tracing::info!(
            component = %self.shared.name,
            server = %self.shared.server,
            lookup = %self.shared.lookup,
            interval_ms = self.shared.interval.as_millis() as u64,
            actuators = self.shared.dependencies.actuator_count(),
            navigation = self.shared.dependencies.navigation_count(),
            "DNS watchdog started"
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn state(&self) -> WatchdogState {
        self.shared.state()
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    pub fn timeout(&self) -> Duration {
        self.shared.probe.timeout()
    }

    /// Run one probe cycle immediately, outside the timer
    pub async fn poll_once(&self) -> CycleOutcome {
        self.shared.poll_once().await
    }

    /// Copy of the current health snapshot
    pub fn snapshot(&self) -> HealthSnapshot {
        self.shared.snapshot.lock().clone()
    }

    pub fn readings(&self) -> Readings {
        self.snapshot().to_readings()
    }

    /// Cancel the polling loop.
    ///
    /// Returns immediately; a probe or stop sweep already in flight runs to
    /// completion.
    pub fn close(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        *self.shared.state.lock() = WatchdogState::Stopped;
        tracing::info!(component = %self.shared.name, "DNS watchdog closed");
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the polling loop to exit. Only meaningful after [`close`](Self::close).
    pub async fn join(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(component = %self.shared.name, error = %e, "polling loop ended abnormally");
            }
        }
    }
}

impl Drop for DnsWatchdog {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
