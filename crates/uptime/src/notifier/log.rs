use async_trait::async_trait;
use tracing::info;

use super::{Notifier, message};
use crate::error::NotifyError;
use crate::scan::MonitoredTarget;
use crate::transition::TransitionKind;

/// Writes transitions to the log instead of an external channel
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, owner: &str, kind: TransitionKind, target: &MonitoredTarget) -> Result<(), NotifyError> {
        info!(owner, target_id = %target.id, event = %kind, "{}", message(kind, target));
        Ok(())
    }
}
