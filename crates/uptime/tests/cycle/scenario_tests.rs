//! End-to-end check cycle scenarios

use std::sync::Arc;

use uptime::{
    CheckCycle, HttpProber, InMemoryReportCache, InMemoryScanStore, MonitoredTarget, ProbeConfig, ScanStore,
    TransitionKind,
};

use crate::common::{
    CountingReportCache, MockResponse, RecordingNotifier, ScriptedProber, closed_port_addr, ok, refused,
    start_mock_server,
};

struct Harness {
    cycle: CheckCycle,
    store: Arc<InMemoryScanStore>,
    notifier: Arc<RecordingNotifier>,
    reports: Arc<CountingReportCache>,
}

fn scripted(results: Vec<uptime::RawResult>) -> Harness {
    let store = Arc::new(InMemoryScanStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let reports = Arc::new(CountingReportCache::default());
    let cycle = CheckCycle::new(
        Arc::new(ScriptedProber::new(results)),
        store.clone(),
        notifier.clone(),
        reports.clone(),
    );

    Harness { cycle, store, notifier, reports }
}

#[tokio::test]
async fn test_keyword_found_stays_up() {
    let target = MonitoredTarget::new("site", "https://example.com", "alice").with_keyword("OK");
    let harness = scripted(vec![ok("system OK"), ok("system OK")]);

    let first = harness.cycle.run(&target).await.unwrap();
    let second = harness.cycle.run(&target).await.unwrap();

    assert!(first.scan.was_online);
    assert_eq!(first.scan.response_status, "OK (200)");
    assert_eq!(second.transition, None);
    assert!(harness.notifier.events().is_empty());
    assert_eq!(harness.reports.regenerated.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_connection_refused_after_up_notifies_once() {
    let target = MonitoredTarget::new("site", "https://example.com", "alice");
    let harness = scripted(vec![ok(""), refused(), refused()]);

    harness.cycle.run(&target).await.unwrap();
    let down = harness.cycle.run(&target).await.unwrap();
    let still_down = harness.cycle.run(&target).await.unwrap();

    assert!(!down.scan.was_online);
    assert_eq!(down.scan.response_status, "connection refused");
    assert_eq!(down.transition, Some(TransitionKind::Down));
    assert!(down.notified);
    assert_eq!(still_down.transition, None);
    assert_eq!(
        harness.notifier.events(),
        vec![("alice".to_string(), TransitionKind::Down, "site".to_string())]
    );
}

#[tokio::test]
async fn test_first_scan_never_notifies() {
    let target = MonitoredTarget::new("site", "https://example.com", "alice");
    let harness = scripted(vec![refused()]);

    let outcome = harness.cycle.run(&target).await.unwrap();

    assert_eq!(outcome.transition, None);
    assert!(!outcome.notified);
    assert!(harness.notifier.events().is_empty());
    assert_eq!(harness.store.last_n(&target, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_keyword_missing_is_down() {
    let target = MonitoredTarget::new("site", "https://example.com", "alice").with_keyword("foo");
    let harness = scripted(vec![ok("bar")]);

    let outcome = harness.cycle.run(&target).await.unwrap();

    assert!(!outcome.scan.was_online);
    assert_eq!(outcome.scan.response_status, "Keyword: foo not found (200)");
}

#[tokio::test]
async fn test_back_up_after_down() {
    let target = MonitoredTarget::new("site", "https://example.com", "bob");
    let harness = scripted(vec![refused(), ok("")]);

    harness.cycle.run(&target).await.unwrap();
    let outcome = harness.cycle.run(&target).await.unwrap();

    assert_eq!(outcome.transition, Some(TransitionKind::BackUp));
    assert_eq!(harness.notifier.events()[0].1, TransitionKind::BackUp);
}

#[tokio::test]
async fn test_targets_are_independent() {
    let a = MonitoredTarget::new("a", "https://a.example", "alice");
    let b = MonitoredTarget::new("b", "https://b.example", "bob");
    let harness = scripted(vec![ok(""), refused()]);

    harness.cycle.run(&a).await.unwrap();
    let outcome = harness.cycle.run(&b).await.unwrap();

    // b has a single scan, so its first failure is a cold start
    assert_eq!(outcome.transition, None);
    assert_eq!(outcome.scan.sequence, 1);
}

#[tokio::test]
async fn test_real_probe_against_mock_server() {
    let _ = tracing_subscriber::fmt::try_init();

    let up = start_mock_server(|_| MockResponse::new("200 OK", "status: all good")).await;
    let down = closed_port_addr().await;

    let store = Arc::new(InMemoryScanStore::new());
    let reports = Arc::new(InMemoryReportCache::new(store.clone()));
    let notifier = Arc::new(RecordingNotifier::default());
    let cycle = CheckCycle::new(
        Arc::new(HttpProber::new(&ProbeConfig::default()).unwrap()),
        store.clone(),
        notifier.clone(),
        reports.clone(),
    );

    let mut target = MonitoredTarget::new("site", format!("http://{up}/"), "alice").with_keyword("all good");
    let first = cycle.run(&target).await.unwrap();
    assert!(first.scan.was_online);

    target.url = format!("http://{down}/");
    let second = cycle.run(&target).await.unwrap();
    assert_eq!(second.transition, Some(TransitionKind::Down));
    assert_eq!(notifier.events().len(), 1);

    let report = reports.get("site").unwrap();
    assert_eq!(report.total_scans, 2);
    assert_eq!(report.uptime_percentage, 50.0);
    assert_eq!(report.latest_was_online, Some(false));
}
