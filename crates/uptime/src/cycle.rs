//! One check cycle: probe, classify, persist, detect, notify, report.
//!
//! Steps for a target run strictly in order. Cycles for different targets
//! share nothing but the scan store and may run in parallel.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::error::{CycleError, NotifyError, ReportError};
use crate::notifier::{self, Notifier};
use crate::probe::Prober;
use crate::report::ReportCache;
use crate::scan::{MonitoredTarget, ScanResult};
use crate::store::ScanStore;
use crate::transition::{TransitionKind, detect_transition};

/// Where a cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Probing,
    Classifying,
    Persisted,
    TransitionCheck,
    Notifying,
    CacheInvalidated,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::Probing => "probing",
            CycleState::Classifying => "classifying",
            CycleState::Persisted => "persisted",
            CycleState::TransitionCheck => "transition_check",
            CycleState::Notifying => "notifying",
            CycleState::CacheInvalidated => "cache_invalidated",
        };
        f.write_str(name)
    }
}

/// What a finished cycle produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    /// The persisted scan
    pub scan: ScanResult,
    pub transition: Option<TransitionKind>,
    /// Whether the notifier accepted the event; false when nothing was sent
    pub notified: bool,
    pub report_regenerated: bool,
}

/// Upper bound for the notify and report steps of a cycle
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs check cycles against shared collaborators
#[derive(Clone)]
pub struct CheckCycle {
    prober: Arc<dyn Prober>,
    store: Arc<dyn ScanStore>,
    notifier: Arc<dyn Notifier>,
    reports: Arc<dyn ReportCache>,
    step_timeout: Duration,
}

impl CheckCycle {
    pub fn new(
        prober: Arc<dyn Prober>,
        store: Arc<dyn ScanStore>,
        notifier: Arc<dyn Notifier>,
        reports: Arc<dyn ReportCache>,
    ) -> Self {
        Self { prober, store, notifier, reports, step_timeout: DEFAULT_STEP_TIMEOUT }
    }

    /// Give up on a notification or report regeneration after `step_timeout`
    pub fn with_step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }

    /// Run one cycle for `target`.
    ///
    /// Only a persistence failure is returned as an error. Notification and
    /// report failures, including running past the step timeout, are logged
    /// and reflected in the outcome.
    pub async fn run(&self, target: &MonitoredTarget) -> Result<CycleOutcome, CycleError> {
        trace_state(target, CycleState::Probing);
        let raw = self.prober.probe(target).await;

        trace_state(target, CycleState::Classifying);
        let scan = classify(target, &raw);

        let scan = self
            .store
            .append(target, scan)
            .await
            .map_err(|source| CycleError::Persistence { target: target.id.clone(), source })?;
        trace_state(target, CycleState::Persisted);
        debug!(
            target_id = %target.id,
            was_online = scan.was_online,
            response_time_ms = scan.response_time_ms,
            "Scan recorded: {}",
            scan.response_status
        );

        trace_state(target, CycleState::TransitionCheck);
        let transition = match detect_transition(self.store.as_ref(), target).await {
            Ok(transition) => transition,
            Err(error) => {
                warn!(target_id = %target.id, "Skipping transition check: {error}");
                None
            }
        };

        let mut notified = false;
        if let Some(transition) = &transition {
            trace_state(target, CycleState::Notifying);
            info!(target_id = %target.id, event = %transition.kind, "Target changed state");

            let sent = timeout(self.step_timeout, notifier::notify(self.notifier.as_ref(), target, transition))
                .await
                .unwrap_or(Err(NotifyError::TimedOut(self.step_timeout)));
            match sent {
                Ok(()) => notified = true,
                Err(error) => warn!(
                    target_id = %target.id,
                    owner = %target.owner,
                    "Failed to notify owner: {error}"
                ),
            }
        }

        let regenerated = timeout(self.step_timeout, self.reports.force_regenerate(target))
            .await
            .unwrap_or(Err(ReportError::TimedOut(self.step_timeout)));
        let report_regenerated = match regenerated {
            Ok(()) => true,
            Err(error) => {
                warn!(target_id = %target.id, "Failed to regenerate uptime report: {error}");
                false
            }
        };
        trace_state(target, CycleState::CacheInvalidated);

        Ok(CycleOutcome {
            scan,
            transition: transition.map(|transition| transition.kind),
            notified,
            report_regenerated,
        })
    }
}

fn trace_state(target: &MonitoredTarget, state: CycleState) {
    debug!(target_id = %target.id, %state, "Check cycle step");
}
