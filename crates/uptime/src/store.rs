//! Append-only scan log per target.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::scan::{MonitoredTarget, ScanResult};

/// Scan persistence required by the check cycle
#[async_trait]
pub trait ScanStore: Send + Sync {
    /// Persist a scan and return it with its per-target sequence assigned.
    ///
    /// Appends for one target are serialized; the returned scan always
    /// orders after every scan previously appended for that target.
    async fn append(&self, target: &MonitoredTarget, scan: ScanResult) -> Result<ScanResult, StoreError>;

    /// Up to `n` scans for the target, newest first
    async fn last_n(&self, target: &MonitoredTarget, n: usize) -> Result<Vec<ScanResult>, StoreError>;
}

#[derive(Default)]
struct TargetLog {
    next_sequence: u64,
    scans: Vec<ScanResult>,
}

/// Process-local scan store
#[derive(Default)]
pub struct InMemoryScanStore {
    logs: RwLock<HashMap<String, Arc<Mutex<TargetLog>>>>,
}

impl InMemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn log_for(&self, target_id: &str) -> Result<Arc<Mutex<TargetLog>>, StoreError> {
        if let Some(log) = self.logs.read().map_err(poisoned)?.get(target_id) {
            return Ok(log.clone());
        }

        let mut logs = self.logs.write().map_err(poisoned)?;
        Ok(logs.entry(target_id.to_string()).or_default().clone())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable("scan log lock poisoned".to_string())
}

#[async_trait]
impl ScanStore for InMemoryScanStore {
    async fn append(&self, target: &MonitoredTarget, mut scan: ScanResult) -> Result<ScanResult, StoreError> {
        let log = self.log_for(&target.id)?;
        let mut log = log.lock().map_err(poisoned)?;

        log.next_sequence += 1;
        scan.sequence = log.next_sequence;
        // createdAt never goes backwards within one target
        if let Some(last) = log.scans.last() {
            scan.created_at = scan.created_at.max(last.created_at);
        }

        log.scans.push(scan.clone());
        Ok(scan)
    }

    async fn last_n(&self, target: &MonitoredTarget, n: usize) -> Result<Vec<ScanResult>, StoreError> {
        let Some(log) = self.logs.read().map_err(poisoned)?.get(&target.id).cloned() else {
            return Ok(Vec::new());
        };
        let log = log.lock().map_err(poisoned)?;

        Ok(log.scans.iter().rev().take(n).cloned().collect())
    }
}
