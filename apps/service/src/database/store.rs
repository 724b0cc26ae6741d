use async_trait::async_trait;
use chrono::DateTime;
use libsql::{Connection, TransactionBehavior, params};
use uptime::{MonitoredTarget, ScanResult, ScanStore, StoreError};

use crate::pool::{LibsqlManager, LibsqlPool};

/// Scan store backed by the `scans` table
pub struct LibsqlScanStore {
    pool: LibsqlPool,
}

impl LibsqlScanStore {
    /// Create a new scan store from a pool
    pub fn new_from_pool(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool
    async fn get_conn(&self) -> Result<deadpool::managed::Object<LibsqlManager>, StoreError> {
        self.pool.get().await.map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

fn backend(error: libsql::Error) -> StoreError {
    StoreError::Backend(error.to_string())
}

async fn insert_scan(conn: &Connection, target_id: &str, scan: &mut ScanResult) -> Result<(), libsql::Error> {
    let mut rows = conn
        .query(
            "SELECT COALESCE(MAX(sequence), 0), MAX(created_at) FROM scans WHERE target_id = ?",
            params![target_id],
        )
        .await?;

    let (last_sequence, last_created_at) = match rows.next().await? {
        Some(row) => (row.get::<i64>(0)?, row.get::<Option<i64>>(1)?),
        None => (0, None),
    };
    drop(rows);

    scan.sequence = last_sequence as u64 + 1;
    // createdAt never goes backwards within one target
    let created_at = scan.created_at.timestamp_millis().max(last_created_at.unwrap_or(i64::MIN));
    if let Some(clamped) = DateTime::from_timestamp_millis(created_at) {
        scan.created_at = clamped;
    }

    conn.execute(
        "INSERT INTO scans (target_id, sequence, response_status, response_time_ms, was_online, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        params![
            target_id,
            scan.sequence as i64,
            scan.response_status.clone(),
            scan.response_time_ms as i64,
            if scan.was_online { 1 } else { 0 },
            created_at
        ],
    )
    .await?;

    Ok(())
}

#[async_trait]
impl ScanStore for LibsqlScanStore {
    async fn append(&self, target: &MonitoredTarget, mut scan: ScanResult) -> Result<ScanResult, StoreError> {
        let conn = self.get_conn().await?;

        // IMMEDIATE takes the write lock up front, serializing sequence assignment
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate).await.map_err(backend)?;
        if let Err(error) = insert_scan(&tx, &target.id, &mut scan).await {
            let _ = tx.rollback().await;
            return Err(backend(error));
        }
        tx.commit().await.map_err(backend)?;

        Ok(scan)
    }

    async fn last_n(&self, target: &MonitoredTarget, n: usize) -> Result<Vec<ScanResult>, StoreError> {
        let conn = self.get_conn().await?;
        let mut stmt = conn
            .prepare("SELECT sequence, response_status, response_time_ms, was_online, created_at FROM scans WHERE target_id = ? ORDER BY sequence DESC LIMIT ?")
            .await
            .map_err(backend)?;

        let mut rows = stmt.query(params![target.id.clone(), n as i64]).await.map_err(backend)?;
        let mut scans = Vec::new();

        while let Some(row) = rows.next().await.map_err(backend)? {
            let created_at: i64 = row.get(4).map_err(backend)?;

            scans.push(ScanResult {
                sequence: row.get::<i64>(0).map_err(backend)? as u64,
                response_status: row.get(1).map_err(backend)?,
                response_time_ms: row.get::<i64>(2).map_err(backend)? as u64,
                was_online: row.get::<i64>(3).map_err(backend)? != 0,
                created_at: DateTime::from_timestamp_millis(created_at)
                    .ok_or_else(|| StoreError::Backend(format!("Invalid created_at: {created_at}")))?,
            });
        }

        Ok(scans)
    }
}
