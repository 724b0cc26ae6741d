//! Turns a raw transport result into a scan.
//!
//! Classification is total and side-effect free: every [`RawResult`]
//! yields a [`ScanResult`], and the same input with the same clock yields
//! the same record.

use chrono::{DateTime, Utc};

use crate::scan::{MonitoredTarget, RawResult, SENTINEL_RESPONSE_TIME_MS, ScanResult};

/// Reason used when the response carries no reason phrase
const UNKNOWN_REASON: &str = "Unknown Status";

/// Classify `raw` for `target`, stamping the scan with the current time
pub fn classify(target: &MonitoredTarget, raw: &RawResult) -> ScanResult {
    classify_at(target, raw, Utc::now())
}

/// Classify `raw` for `target` with an explicit creation time
pub fn classify_at(target: &MonitoredTarget, raw: &RawResult, created_at: DateTime<Utc>) -> ScanResult {
    let response_time_ms = raw.transfer_time_ms().unwrap_or(SENTINEL_RESPONSE_TIME_MS);

    let (was_online, response_status) = match raw {
        RawResult::TransportError { message, .. } => (false, message.clone()),
        RawResult::Response { status_code, reason_phrase, body, .. } => {
            let keyword_found = target.keyword().is_none_or(|keyword| contains_bytes(body, keyword.as_bytes()));

            if *status_code == 200 && !keyword_found {
                let keyword = target.keyword().unwrap_or_default();
                (false, format!("Keyword: {keyword} not found (200)"))
            } else {
                let reason = match reason_phrase.trim() {
                    "" => UNKNOWN_REASON,
                    phrase => phrase,
                };
                (*status_code == 200 && keyword_found, format!("{reason} ({status_code})"))
            }
        }
    };

    ScanResult { response_status, response_time_ms, was_online, created_at, sequence: 0 }
}

/// Case-sensitive substring search on raw bytes, independent of the body's encoding
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
