//! Uptime - probe and transition core for website monitoring
//!
//! One check cycle probes a target over HTTP, classifies the outcome into a
//! scan, appends it to the scan store, compares the two newest scans for an
//! up/down flip, notifies the owner on a flip and finally regenerates the
//! cached uptime report.

pub mod classifier;
pub mod cycle;
pub mod error;
pub mod notifier;
pub mod probe;
pub mod report;
pub mod scan;
pub mod store;
pub mod transition;

// Re-export main types
pub use classifier::{classify, classify_at};
pub use cycle::{CheckCycle, CycleOutcome};
pub use error::{CycleError, NotifyError, ProbeError, ReportError, StoreError};
pub use notifier::{LogNotifier, Notifier, WebhookNotifier};
pub use probe::{HttpProber, ProbeConfig, Prober};
pub use report::{InMemoryReportCache, ReportCache, UptimeReport};
pub use scan::{MonitoredTarget, RawResult, ScanResult, SENTINEL_RESPONSE_TIME_MS};
pub use store::{InMemoryScanStore, ScanStore};
pub use transition::{Transition, TransitionKind, detect_transition};

/// Default `User-Agent` sent with every probe
pub const DEFAULT_USER_AGENT: &str = concat!("uptime-monitor/", env!("CARGO_PKG_VERSION"));
