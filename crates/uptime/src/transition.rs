//! Up/down edge detection over the two newest scans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::scan::{MonitoredTarget, ScanResult};
use crate::store::ScanStore;

/// Direction of a state flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Down,
    BackUp,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Down => write!(f, "down"),
            TransitionKind::BackUp => write!(f, "back_up"),
        }
    }
}

/// A flip between two consecutive scans of one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub previous: ScanResult,
    pub now: ScanResult,
}

impl Transition {
    /// Compare two consecutive scans; `None` when both share a state
    pub fn between(previous: &ScanResult, now: &ScanResult) -> Option<Self> {
        let kind = match (previous.was_online, now.was_online) {
            (false, true) => TransitionKind::BackUp,
            (true, false) => TransitionKind::Down,
            _ => return None,
        };

        Some(Self { kind, previous: previous.clone(), now: now.clone() })
    }

    /// Detect a transition from scans ordered newest first.
    ///
    /// Only the first two entries are looked at; anything older is ignored.
    pub fn from_newest_first(scans: &[ScanResult]) -> Option<Self> {
        match scans {
            [now, previous, ..] => Self::between(previous, now),
            _ => None,
        }
    }
}

/// Read the two newest scans of `target` and report a flip between them
pub async fn detect_transition(
    store: &dyn ScanStore,
    target: &MonitoredTarget,
) -> Result<Option<Transition>, StoreError> {
    let last_two = store.last_n(target, 2).await?;
    Ok(Transition::from_newest_first(&last_two))
}
