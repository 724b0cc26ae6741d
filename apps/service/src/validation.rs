//! Checks applied to configured targets before they are scheduled.

use std::collections::HashSet;

use anyhow::{Result, anyhow};
use url::Url;

use crate::config::{Config, TargetConfig};

const MIN_INTERVAL: u64 = 10; // 10 seconds
const MAX_INTERVAL: u64 = 86400; // 24 hours
const MAX_TIMEOUT: u64 = 300; // 5 minutes

/// Validate every target plus the probe, notification and cycle timeouts
pub fn validate_config(config: &Config) -> Result<()> {
    validate_timeout(config.probe.connect_timeout_seconds)?;
    validate_timeout(config.probe.read_timeout_seconds)?;
    validate_timeout(config.probe.timeout_seconds)?;
    validate_timeout(config.notifications.timeout_seconds)?;
    validate_timeout(config.notifications.connect_timeout_seconds)?;
    validate_timeout(config.scheduler.step_timeout_seconds)?;

    let mut seen = HashSet::new();
    for target in &config.targets {
        if !seen.insert(target.id.as_str()) {
            return Err(anyhow!("Duplicate target id: {}", target.id));
        }
        validate_target(target).map_err(|e| anyhow!("Target '{}': {}", target.id, e))?;
        validate_check_interval(config.interval_for(target))
            .map_err(|e| anyhow!("Target '{}': {}", target.id, e))?;
    }

    Ok(())
}

/// Validate a single target entry
pub fn validate_target(target: &TargetConfig) -> Result<()> {
    if target.id.trim().is_empty() {
        return Err(anyhow!("Target id cannot be empty"));
    }
    if target.owner.trim().is_empty() {
        return Err(anyhow!("Owner cannot be empty"));
    }

    validate_http_endpoint(&target.url)
}

/// Validate HTTP/HTTPS URL endpoint
pub fn validate_http_endpoint(target: &str) -> Result<()> {
    if target.trim().is_empty() {
        return Err(anyhow!("URL cannot be empty"));
    }

    let url = Url::parse(target).map_err(|e| {
        if target.contains("://") {
            anyhow!("Invalid URL: {}", e)
        } else {
            anyhow!("URL must include scheme (http:// or https://)")
        }
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(anyhow!("Invalid scheme '{}'. Must be http or https", other)),
    }

    if url.host_str().is_none() {
        return Err(anyhow!("URL must have a valid host"));
    }

    if url.port() == Some(0) {
        return Err(anyhow!("Port 0 is not valid"));
    }

    Ok(())
}

/// Validate check interval
pub fn validate_check_interval(interval_seconds: u64) -> Result<()> {
    if interval_seconds < MIN_INTERVAL {
        return Err(anyhow!(
            "Check interval too short: {} seconds (minimum: {})",
            interval_seconds,
            MIN_INTERVAL
        ));
    }

    if interval_seconds > MAX_INTERVAL {
        return Err(anyhow!(
            "Check interval too long: {} seconds (maximum: {})",
            interval_seconds,
            MAX_INTERVAL
        ));
    }

    Ok(())
}

/// Validate timeout is reasonable
pub fn validate_timeout(timeout_seconds: u64) -> Result<()> {
    if timeout_seconds == 0 {
        return Err(anyhow!("Timeout must be at least 1 second"));
    }

    if timeout_seconds > MAX_TIMEOUT {
        return Err(anyhow!(
            "Timeout too long: {} seconds (maximum: {})",
            timeout_seconds,
            MAX_TIMEOUT
        ));
    }

    Ok(())
}
