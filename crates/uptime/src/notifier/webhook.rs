use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;

use super::{Notifier, message};
use crate::error::NotifyError;
use crate::scan::MonitoredTarget;
use crate::transition::TransitionKind;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 5;

/// JSON body posted to the webhook
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    owner: &'a str,
    event: TransitionKind,
    target_id: &'a str,
    url: &'a str,
    message: String,
}

/// A notifier that POSTs each transition to a webhook URL
pub struct WebhookNotifier {
    client: Client,
    url: Url,
}

impl WebhookNotifier {
    pub fn new(url: impl AsRef<str>) -> Result<Self, NotifyError> {
        Self::with_timeouts(
            url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECONDS),
        )
    }

    /// Build a notifier whose requests give up after `timeout`
    pub fn with_timeouts(url: impl AsRef<str>, timeout: Duration, connect_timeout: Duration) -> Result<Self, NotifyError> {
        let url = parse_webhook_url(url.as_ref())?;
        let client = Client::builder().timeout(timeout).connect_timeout(connect_timeout).build()?;

        Ok(Self { client, url })
    }
}

fn parse_webhook_url(raw: &str) -> Result<Url, NotifyError> {
    let url = Url::parse(raw).map_err(|e| NotifyError::InvalidConfiguration(format!("Invalid webhook URL {raw}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(NotifyError::InvalidConfiguration(format!("Webhook URL must be http(s): {raw}")));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(NotifyError::InvalidConfiguration(format!("Webhook URL has no host: {raw}")));
    }

    Ok(url)
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, owner: &str, kind: TransitionKind, target: &MonitoredTarget) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            owner,
            event: kind,
            target_id: &target.id,
            url: &target.url,
            message: message(kind, target),
        };

        let response = self.client.post(self.url.clone()).json(&payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(NotifyError::SendFailed(format!(
                "Webhook returned non-success status: {status}. Body: {error_body}"
            )));
        }

        Ok(())
    }
}
