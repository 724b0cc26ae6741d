//! Data model shared by every step of the check cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response time recorded when no transfer time was measured
pub const SENTINEL_RESPONSE_TIME_MS: u64 = 3001;

/// A website to check, owned by the target registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredTarget {
    /// Stable identifier of the target
    pub id: String,

    /// URL probed with a GET request
    pub url: String,

    /// Substring the response body must contain to count as online
    #[serde(default)]
    pub keyword: Option<String>,

    /// Reference to the user notified about transitions
    pub owner: String,
}

impl MonitoredTarget {
    pub fn new(id: impl Into<String>, url: impl Into<String>, owner: impl Into<String>) -> Self {
        Self { id: id.into(), url: url.into(), keyword: None, owner: owner.into() }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Configured keyword, treating an empty string as no keyword
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|keyword| !keyword.is_empty())
    }
}

/// What the transport produced for one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawResult {
    /// Any HTTP response, whatever its status code
    Response {
        status_code: u16,
        reason_phrase: String,
        /// Raw body bytes, undecoded
        body: Vec<u8>,
        transfer_time_ms: Option<u64>,
    },
    /// DNS, connect, TLS or timeout failure
    TransportError { message: String, transfer_time_ms: Option<u64> },
}

impl RawResult {
    /// Transfer time captured by the probe, if any
    pub fn transfer_time_ms(&self) -> Option<u64> {
        match self {
            RawResult::Response { transfer_time_ms, .. }
            | RawResult::TransportError { transfer_time_ms, .. } => *transfer_time_ms,
        }
    }
}

/// One immutable record of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Reason phrase with code, keyword message or transport error text
    pub response_status: String,

    /// Transfer time, or [`SENTINEL_RESPONSE_TIME_MS`]
    pub response_time_ms: u64,

    pub was_online: bool,

    pub created_at: DateTime<Utc>,

    /// Per-target append order assigned by the scan store; 0 until persisted
    #[serde(default)]
    pub sequence: u64,
}

impl ScanResult {
    pub fn is_persisted(&self) -> bool {
        self.sequence > 0
    }
}
