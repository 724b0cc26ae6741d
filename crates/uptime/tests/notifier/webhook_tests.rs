//! WebhookNotifier end to end

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uptime::{MonitoredTarget, Notifier, NotifyError, TransitionKind, WebhookNotifier};

use crate::common::{MockRequest, MockResponse, start_mock_server};

async fn recording_hook(response: MockResponse) -> (String, Arc<Mutex<Vec<MockRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let addr = start_mock_server(move |request| {
        log.lock().unwrap().push(request.clone());
        response.clone()
    })
    .await;

    (format!("http://{addr}/hooks/uptime"), seen)
}

#[tokio::test]
async fn test_webhook_delivers_payload() {
    let (url, seen) = recording_hook(MockResponse::new("200 OK", "")).await;
    let target = MonitoredTarget::new("shop", "https://shop.example.com", "alice");

    WebhookNotifier::new(url).unwrap().send("alice", TransitionKind::Down, &target).await.unwrap();

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/hooks/uptime");

    let payload: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(payload["owner"], "alice");
    assert_eq!(payload["event"], "down");
    assert_eq!(payload["target_id"], "shop");
    assert_eq!(payload["url"], "https://shop.example.com");
    assert_eq!(payload["message"], "https://shop.example.com is down");
}

#[tokio::test]
async fn test_webhook_error_status_is_send_failure() {
    let (url, seen) = recording_hook(MockResponse::new("500 Internal Server Error", "queue full")).await;
    let target = MonitoredTarget::new("shop", "https://shop.example.com", "alice");

    let result = WebhookNotifier::new(url).unwrap().send("alice", TransitionKind::BackUp, &target).await;

    match result {
        Err(NotifyError::SendFailed(message)) => {
            assert!(message.contains("500"), "{message}");
            assert!(message.contains("queue full"), "{message}");
        }
        other => panic!("expected SendFailed, got {other:?}"),
    }
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_webhook_gives_up_after_timeout() {
    let (url, _) = recording_hook(MockResponse::new("200 OK", "").delayed(Duration::from_secs(3600))).await;
    let target = MonitoredTarget::new("shop", "https://shop.example.com", "alice");
    let notifier = WebhookNotifier::with_timeouts(url, Duration::from_millis(200), Duration::from_secs(1)).unwrap();

    let start = Instant::now();
    let result = notifier.send("alice", TransitionKind::Down, &target).await;

    assert!(matches!(&result, Err(NotifyError::Network(e)) if e.is_timeout()), "{result:?}");
    assert!(start.elapsed() < Duration::from_secs(10));
}
