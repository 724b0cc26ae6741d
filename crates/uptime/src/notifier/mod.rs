use async_trait::async_trait;

use crate::error::NotifyError;
use crate::scan::MonitoredTarget;
use crate::transition::{Transition, TransitionKind};

pub mod log;
pub mod webhook;

pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

/// A channel that tells a target's owner about a transition.
/// [`LogNotifier`] writes the event to the log and [`WebhookNotifier`]
/// POSTs it as JSON.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one event.
    ///
    /// # Arguments
    ///
    /// * `owner` - Reference to the user that owns the target.
    /// * `kind` - Which way the target flipped.
    /// * `target` - The target that flipped.
    async fn send(&self, owner: &str, kind: TransitionKind, target: &MonitoredTarget) -> Result<(), NotifyError>;
}

/// Send the notification for a detected transition to the target's owner
pub async fn notify(
    notifier: &dyn Notifier,
    target: &MonitoredTarget,
    transition: &Transition,
) -> Result<(), NotifyError> {
    notifier.send(&target.owner, transition.kind, target).await
}

/// Human readable line describing the event
pub fn message(kind: TransitionKind, target: &MonitoredTarget) -> String {
    match kind {
        TransitionKind::Down => format!("{} is down", target.url),
        TransitionKind::BackUp => format!("{} is back up", target.url),
    }
}
