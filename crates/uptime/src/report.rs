//! Cached uptime summaries, regenerated after every scan.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, StoreError};
use crate::scan::{MonitoredTarget, ScanResult};
use crate::store::ScanStore;

/// Number of recent scans a report summarises
pub const DEFAULT_REPORT_WINDOW: usize = 100;

/// Summary of a target's recent scan history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeReport {
    pub target_id: String,
    pub total_scans: usize,
    pub online_scans: usize,
    /// Percentage rounded to two decimals; 100.0 with no scans
    pub uptime_percentage: f64,
    /// Mean response time of online scans
    pub average_response_time_ms: Option<u64>,
    pub latest_status: Option<String>,
    pub latest_was_online: Option<bool>,
    pub generated_at: DateTime<Utc>,
}

impl UptimeReport {
    /// Build a report from scans ordered newest first
    pub fn from_scans(target_id: &str, scans: &[ScanResult]) -> Self {
        let total_scans = scans.len();
        let online: Vec<&ScanResult> = scans.iter().filter(|scan| scan.was_online).collect();
        let online_scans = online.len();

        let uptime_percentage = if total_scans == 0 {
            100.0
        } else {
            let ratio = online_scans as f64 / total_scans as f64 * 100.0;
            (ratio * 100.0).round() / 100.0
        };

        let average_response_time_ms = if online.is_empty() {
            None
        } else {
            let sum: u64 = online.iter().map(|scan| scan.response_time_ms).sum();
            Some(sum / online_scans as u64)
        };

        let latest = scans.first();

        Self {
            target_id: target_id.to_string(),
            total_scans,
            online_scans,
            uptime_percentage,
            average_response_time_ms,
            latest_status: latest.map(|scan| scan.response_status.clone()),
            latest_was_online: latest.map(|scan| scan.was_online),
            generated_at: Utc::now(),
        }
    }
}

/// Report subsystem the check cycle pokes after each scan
#[async_trait]
pub trait ReportCache: Send + Sync {
    /// Rebuild the cached report for `target`, ignoring staleness
    async fn force_regenerate(&self, target: &MonitoredTarget) -> Result<(), ReportError>;
}

/// Keeps one report per target in memory, computed from the scan store
pub struct InMemoryReportCache {
    store: Arc<dyn ScanStore>,
    window: usize,
    reports: RwLock<HashMap<String, UptimeReport>>,
}

impl InMemoryReportCache {
    pub fn new(store: Arc<dyn ScanStore>) -> Self {
        Self::with_window(store, DEFAULT_REPORT_WINDOW)
    }

    pub fn with_window(store: Arc<dyn ScanStore>, window: usize) -> Self {
        Self { store, window, reports: RwLock::new(HashMap::new()) }
    }

    /// Cached report for a target, if one was generated
    pub fn get(&self, target_id: &str) -> Option<UptimeReport> {
        self.reports.read().ok()?.get(target_id).cloned()
    }
}

#[async_trait]
impl ReportCache for InMemoryReportCache {
    async fn force_regenerate(&self, target: &MonitoredTarget) -> Result<(), ReportError> {
        let scans = self.store.last_n(target, self.window).await?;
        let report = UptimeReport::from_scans(&target.id, &scans);

        self.reports
            .write()
            .map_err(|_| StoreError::Unavailable("report cache lock poisoned".to_string()))?
            .insert(target.id.clone(), report);

        Ok(())
    }
}
