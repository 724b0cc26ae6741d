//! Probe behaviour for servers that answer

use uptime::{HttpProber, MonitoredTarget, ProbeConfig, Prober, RawResult, classify};

use crate::common::{MockResponse, start_mock_server};

fn prober() -> HttpProber {
    HttpProber::new(&ProbeConfig::default()).unwrap()
}

#[tokio::test]
async fn test_probe_ok_response() {
    let addr = start_mock_server(|_| MockResponse::new("200 OK", "system OK")).await;
    let target = MonitoredTarget::new("site", format!("http://{addr}/"), "alice");

    match prober().probe(&target).await {
        RawResult::Response { status_code, reason_phrase, body, transfer_time_ms } => {
            assert_eq!(status_code, 200);
            assert_eq!(reason_phrase, "OK");
            assert_eq!(body, b"system OK");
            assert!(transfer_time_ms.is_some());
        }
        other => panic!("expected a response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_does_not_fail_on_error_status() {
    let addr = start_mock_server(|_| MockResponse::new("503 Service Unavailable", "maintenance")).await;
    let target = MonitoredTarget::new("site", format!("http://{addr}/"), "alice");

    let raw = prober().probe(&target).await;
    let scan = classify(&target, &raw);

    assert!(!scan.was_online);
    assert_eq!(scan.response_status, "Service Unavailable (503)");
    assert_ne!(scan.response_time_ms, uptime::SENTINEL_RESPONSE_TIME_MS);
}

#[tokio::test]
async fn test_probe_follows_redirects() {
    let addr = start_mock_server(|request| match request.path.as_str() {
        "/old" => MockResponse::redirect("/new"),
        _ => MockResponse::new("200 OK", "moved here: OK"),
    })
    .await;
    let target = MonitoredTarget::new("site", format!("http://{addr}/old"), "alice").with_keyword("moved here");

    let scan = classify(&target, &prober().probe(&target).await);

    assert!(scan.was_online);
    assert_eq!(scan.response_status, "OK (200)");
}

#[tokio::test]
async fn test_probe_keyword_missing() {
    let addr = start_mock_server(|_| MockResponse::new("200 OK", "<html>welcome</html>")).await;
    let target = MonitoredTarget::new("site", format!("http://{addr}/"), "alice").with_keyword("foo");

    let scan = classify(&target, &prober().probe(&target).await);

    assert!(!scan.was_online);
    assert_eq!(scan.response_status, "Keyword: foo not found (200)");
}

#[tokio::test]
async fn test_server_reason_phrase_is_kept() {
    let addr = start_mock_server(|_| MockResponse::new("599 Network Connect Timeout", "upstream gone")).await;
    let target = MonitoredTarget::new("site", format!("http://{addr}/"), "alice");

    let scan = classify(&target, &prober().probe(&target).await);

    assert!(!scan.was_online);
    assert_eq!(scan.response_status, "Network Connect Timeout (599)");
}

#[tokio::test]
async fn test_non_canonical_phrase_on_known_status() {
    let addr = start_mock_server(|_| MockResponse::new("503 Back Soon", "")).await;
    let target = MonitoredTarget::new("site", format!("http://{addr}/"), "alice");

    let scan = classify(&target, &prober().probe(&target).await);

    assert_eq!(scan.response_status, "Back Soon (503)");
}
