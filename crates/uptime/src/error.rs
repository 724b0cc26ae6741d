//! Error types for the check cycle.
//!
//! Transport failures are not errors here: the probe folds them into
//! [`crate::scan::RawResult::TransportError`].

use std::time::Duration;

use thiserror::Error;

/// The scan store could not serve a request
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Scan store unavailable: {0}")]
    Unavailable(String),
    #[error("Scan store backend error: {0}")]
    Backend(String),
}

/// A notification could not be delivered
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
    #[error("Invalid configuration for notifier: {0}")]
    InvalidConfiguration(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Notification not delivered within {0:?}")]
    TimedOut(Duration),
}

/// The uptime report could not be regenerated
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to read scan history: {0}")]
    Store(#[from] StoreError),
    #[error("Report not regenerated within {0:?}")]
    TimedOut(Duration),
}

/// The HTTP prober could not be built
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The only failure that escapes a check cycle.
///
/// A cycle aborts before transition detection when the scan was not
/// persisted, so a transition is never evaluated against unpersisted data.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Scan for {target} was not persisted: {source}")]
    Persistence {
        target: String,
        #[source]
        source: StoreError,
    },
}
