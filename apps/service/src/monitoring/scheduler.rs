use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::{MissedTickBehavior, interval};
use uptime::{CheckCycle, CycleError, CycleOutcome, MonitoredTarget};

use crate::config::Config;

/// Target configuration for scheduling
#[derive(Debug, Clone)]
pub struct ScheduledTarget {
    pub target: MonitoredTarget,
    pub interval_seconds: u64,
    pub enabled: bool,
}

impl ScheduledTarget {
    /// Build the schedule for every configured target
    pub fn from_config(config: &Config) -> Vec<Self> {
        config
            .targets
            .iter()
            .map(|entry| Self {
                target: entry.to_target(),
                interval_seconds: config.interval_for(entry),
                enabled: entry.enabled,
            })
            .collect()
    }
}

/// Monitoring scheduler - runs check cycles for each target on its interval
pub struct MonitoringScheduler {
    cycle: CheckCycle,
    permits: Arc<Semaphore>,
}

impl MonitoringScheduler {
    /// Create a new monitoring scheduler
    pub fn new(cycle: CheckCycle, max_concurrent_checks: usize) -> Self {
        Self { cycle, permits: Arc::new(Semaphore::new(max_concurrent_checks.max(1))) }
    }

    /// Run one cycle, waiting for a free slot first
    async fn run_cycle(
        cycle: &CheckCycle,
        permits: &Semaphore,
        target: &MonitoredTarget,
    ) -> Result<CycleOutcome, CycleError> {
        // The semaphore is never closed
        let _permit = permits.acquire().await.ok();
        cycle.run(target).await
    }

    /// Schedule a single target for periodic checking
    pub fn schedule_target(&self, scheduled: ScheduledTarget) -> tokio::task::JoinHandle<()> {
        let cycle = self.cycle.clone();
        let permits = self.permits.clone();

        tokio::spawn(async move {
            if !scheduled.enabled {
                tracing::info!(target_id = %scheduled.target.id, "Target disabled, not scheduling");
                return;
            }

            let mut timer = interval(Duration::from_secs(scheduled.interval_seconds));
            // A slow cycle skips ticks instead of bursting to catch up
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                timer.tick().await;

                if let Err(e) = Self::run_cycle(&cycle, &permits, &scheduled.target).await {
                    tracing::error!(target_id = %scheduled.target.id, "Check cycle failed: {}", e);
                }
            }
        })
    }

    /// Schedule multiple targets
    pub fn schedule_targets(&self, targets: Vec<ScheduledTarget>) -> Vec<tokio::task::JoinHandle<()>> {
        targets.into_iter().map(|scheduled| self.schedule_target(scheduled)).collect()
    }

    /// Run a single cycle for every enabled target concurrently
    pub async fn run_once(
        &self,
        targets: &[ScheduledTarget],
    ) -> Vec<(String, Result<CycleOutcome, CycleError>)> {
        let runs = targets.iter().filter(|scheduled| scheduled.enabled).map(|scheduled| async move {
            let result = Self::run_cycle(&self.cycle, &self.permits, &scheduled.target).await;
            (scheduled.target.id.clone(), result)
        });

        join_all(runs).await
    }
}
