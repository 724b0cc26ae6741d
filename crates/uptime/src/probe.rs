//! Bounded HTTP probe of a single target.
//!
//! A probe never fails: transport problems come back as
//! [`RawResult::TransportError`] and every HTTP status is a normal
//! response to classify.

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use hyper::ext::ReasonPhrase;
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DEFAULT_USER_AGENT;
use crate::error::ProbeError;
use crate::scan::{MonitoredTarget, RawResult};

/// Redirect hops followed before the probe gives up
const MAX_REDIRECTS: usize = 10;

/// HTTP client settings for probing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub user_agent: String,
    pub connect_timeout_seconds: u64,
    pub read_timeout_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_seconds: 20,
            read_timeout_seconds: 20,
            timeout_seconds: 60,
        }
    }
}

/// Prober trait for the first step of a check cycle
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Probe the target once, without retrying
    async fn probe(&self, target: &MonitoredTarget) -> RawResult;
}

/// reqwest backed prober
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .read_timeout(Duration::from_secs(config.read_timeout_seconds))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &MonitoredTarget) -> RawResult {
        let start = Instant::now();

        let response = match self.client.get(&target.url).send().await {
            Ok(response) => response,
            Err(error) => {
                debug!(target_id = %target.id, "Probe failed before a response arrived: {error}");
                return RawResult::TransportError {
                    message: describe_transport_error(&error),
                    transfer_time_ms: None,
                };
            }
        };

        let status = response.status();
        let reason_phrase = reason_phrase(&response);
        let headers_received = elapsed_ms(start);

        match response.bytes().await {
            Ok(body) => RawResult::Response {
                status_code: status.as_u16(),
                reason_phrase,
                body: body.to_vec(),
                transfer_time_ms: Some(elapsed_ms(start)),
            },
            Err(error) => {
                debug!(target_id = %target.id, "Probe failed while reading the body: {error}");
                RawResult::TransportError {
                    message: describe_transport_error(&error),
                    transfer_time_ms: Some(headers_received),
                }
            }
        }
    }
}

/// Reason phrase as sent by the server.
///
/// hyper only keeps the wire phrase when it differs from the canonical one.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => response.status().canonical_reason().unwrap_or_default().to_string(),
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Flatten a reqwest error and its causes into one line.
///
/// reqwest's own message only names the failing URL; the useful part
/// ("Connection refused", "dns error", ...) sits further down the chain.
fn describe_transport_error(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    message
}
