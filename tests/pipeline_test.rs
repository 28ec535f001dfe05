//! 探测流水线测试
//!
//! 测试调度器、检测循环和错误上报组装后的端到端行为

use async_trait::async_trait;
use service_probe::health::check::{opt_expect_code, opt_failure, opt_success, opt_url};
use service_probe::health::ErrorReporter;
use service_probe::{Check, CheckError, ProbeError, ProbeService, ProbeSettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{sleep, timeout, Instant};

#[derive(Default)]
struct CollectingReporter {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl ErrorReporter for CollectingReporter {
    async fn report(&self, error: &CheckError) {
        self.messages.lock().await.push(error.to_string());
    }
}

fn fast_settings() -> ProbeSettings {
    ProbeSettings {
        check_interval: Duration::from_millis(100),
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_run_once_reports_each_failure_in_order() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server.mock("GET", "/ok").with_status(200).create_async().await;
    let _broken = server
        .mock("GET", "/broken")
        .with_status(500)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let checks = vec![
        Check::new([opt_url(format!("{}/ok", server.url()))]),
        Check::new([opt_url(format!("{}/broken", server.url())), opt_success()]),
        Check::new([opt_url(format!("{}/missing", server.url())), opt_failure()]),
        Check::new([opt_url("http://127.0.0.1:1/"), opt_success()]),
        Check::new([
            opt_url(format!("{}/ok", server.url())),
            opt_expect_code([201]),
        ]),
    ];

    let reporter = Arc::new(CollectingReporter::default());
    let (shutdown_tx, _) = broadcast::channel(1);
    let reported = ProbeService::new(fast_settings(), checks)
        .unwrap()
        .with_reporter(reporter.clone())
        .run_once(&shutdown_tx)
        .await
        .unwrap();

    assert_eq!(reported, 3);
    let messages = reporter.messages.lock().await;
    assert!(messages[0].contains("500"));
    assert!(messages[0].contains("expected success"));
    assert!(messages[1].starts_with("cannot execute request because "));
    assert!(messages[2].contains("unexpected response code 200 (expected [201])"));
}

#[tokio::test]
async fn test_periodic_run_until_shutdown() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/flaky")
        .with_status(503)
        .expect_at_least(2)
        .create_async()
        .await;

    let checks = vec![Check::new([opt_url(format!("{}/flaky", server.url()))])];
    let reporter = Arc::new(CollectingReporter::default());
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let service = ProbeService::new(fast_settings(), checks)
        .unwrap()
        .with_reporter(reporter.clone());
    let shutdown = shutdown_tx.clone();
    let run = tokio::spawn(async move { service.run(&shutdown, shutdown_rx).await });

    let deadline = Instant::now() + Duration::from_secs(5);
    while reporter.messages.lock().await.len() < 2 {
        assert!(Instant::now() < deadline, "未在期限内收到两次上报");
        sleep(Duration::from_millis(20)).await;
    }

    shutdown_tx.send(()).unwrap();
    let reported = timeout(Duration::from_secs(5), run)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert!(reported >= 2);
    mock.assert_async().await;
    for message in reporter.messages.lock().await.iter() {
        assert!(message.contains("unexpected response code 503 (expected success)"));
        assert!(message.ends_with("/flaky]"));
    }
}

#[tokio::test]
async fn test_shutdown_before_first_firing_reports_nothing() {
    let settings = ProbeSettings {
        check_interval: Duration::from_secs(60),
        ..fast_settings()
    };
    let checks = vec![Check::new([opt_url("http://127.0.0.1:1/")])];
    let reporter = Arc::new(CollectingReporter::default());
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let service = ProbeService::new(settings, checks)
        .unwrap()
        .with_reporter(reporter.clone());
    assert_eq!(service.settings().check_interval, Duration::from_secs(60));
    let shutdown = shutdown_tx.clone();
    let run = tokio::spawn(async move { service.run(&shutdown, shutdown_rx).await });

    sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(()).unwrap();

    let reported = timeout(Duration::from_secs(5), run)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(reported, 0);
    assert!(reporter.messages.lock().await.is_empty());
}

#[tokio::test]
async fn test_shutdown_sent_before_run_still_stops_service() {
    let checks = vec![Check::new([opt_url("http://127.0.0.1:1/")])];
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // 信号在各任务订阅之前到达
    shutdown_tx.send(()).unwrap();

    let service = ProbeService::new(fast_settings(), checks).unwrap();
    let reported = timeout(Duration::from_secs(5), service.run(&shutdown_tx, shutdown_rx))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reported, 0);
}

#[test]
fn test_zero_interval_rejected() {
    let settings = ProbeSettings {
        check_interval: Duration::ZERO,
        ..fast_settings()
    };
    let result = ProbeService::new(settings, vec![Check::default()]);
    assert!(matches!(result, Err(ProbeError::Config(_))));

    let settings = ProbeSettings {
        request_timeout: Duration::ZERO,
        ..fast_settings()
    };
    assert!(ProbeService::new(settings, Vec::new()).is_err());
}
