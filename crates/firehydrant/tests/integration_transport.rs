//! Rate limiting and throttle retry against a mock server

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use firehydrant::resources::services::ServiceQuery;
use firehydrant::{Error, RateLimitedTransport, RequestContext, TokenBucket, Unlimited, WaitAborted};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_always_throttled_makes_exactly_five_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/svc-1"))
        .respond_with(ResponseTemplate::new(429).set_body_json(common::error_json("slow down")))
        .expect(5)
        .mount(&mock_server)
        .await;

    let client = common::test_client(mock_server.uri());
    let error = client.services().get("svc-1").await.unwrap_err();

    // The fifth 429 is handed to the envelope layer, not treated as a retry failure.
    assert_eq!(error.status(), Some(429));
    assert_matches!(error.root(), Error::Api { envelope, .. } if envelope.error.as_deref() == Some("slow down"));
    assert_eq!(
        error.to_string(),
        "could not get service: API error (status 429): error: slow down"
    );

    mock_server.verify().await;
}

#[tokio::test]
async fn test_throttle_then_success_recovers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/svc-1"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/svc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::service_json("svc-1", "checkout")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::test_client(mock_server.uri());
    let service = client.services().get("svc-1").await.expect("should recover");

    assert_eq!(service.name, "checkout");
    mock_server.verify().await;
}

#[tokio::test]
async fn test_retry_after_above_ceiling_uses_default_backoff() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/svc-1"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "45"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/svc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::service_json("svc-1", "checkout")),
        )
        .mount(&mock_server)
        .await;

    let client = common::test_client(mock_server.uri());
    let started = Instant::now();
    client.services().get("svc-1").await.unwrap();

    // 45s is ignored in favour of the 10ms default.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teams/t-1"))
        .respond_with(ResponseTemplate::new(503).set_body_json(common::error_json("maintenance")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::test_client(mock_server.uri());
    let error = client.teams().get("t-1").await.unwrap_err();

    assert_eq!(error.status(), Some(503));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_streaming_body_is_sent_without_replay_copy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/uploads"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::new();
    let request = http
        .post(format!("{}/uploads", mock_server.uri()))
        .body(reqwest::Body::wrap(reqwest::Body::from("hello")))
        .build()
        .unwrap();
    let transport = RateLimitedTransport::new(Arc::new(http), Arc::new(Unlimited));

    let response = transport
        .execute(&RequestContext::background(), request)
        .await
        .expect("a body that cannot be cloned only rules out retries");

    assert_eq!(response.status(), 200);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_deadline_while_waiting_for_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/svc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::service_json("svc-1", "checkout")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let limiter = TokenBucket::with_period(Duration::from_secs(60), 1).unwrap();
    let client = common::test_client_with_limiter(mock_server.uri(), Arc::new(limiter));

    client.services().get("svc-1").await.expect("first call uses the burst");

    let ctx = RequestContext::background().with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    let error = client
        .services()
        .with_context(ctx)
        .get("svc-1")
        .await
        .unwrap_err();

    assert!(error.is_rate_limit_timeout());
    assert!(started.elapsed() < Duration::from_millis(200));
    assert_matches!(
        error.root(),
        Error::RateLimitTimeout {
            source: WaitAborted::DeadlineExceeded,
            ..
        }
    );

    // The second request never reached the server.
    mock_server.verify().await;
}

#[tokio::test]
async fn test_cancellation_while_waiting_for_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let limiter = TokenBucket::with_period(Duration::from_secs(60), 1).unwrap();
    let client = common::test_client_with_limiter(mock_server.uri(), Arc::new(limiter));
    client.services().list(&ServiceQuery::default()).await.unwrap();

    let token = CancellationToken::new();
    let services = client
        .services()
        .with_context(RequestContext::background().with_cancellation(token.clone()));

    let pending = tokio::spawn(async move { services.list(&ServiceQuery::default()).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let error = pending.await.unwrap().unwrap_err();
    assert_matches!(
        error.root(),
        Error::RateLimitTimeout {
            source: WaitAborted::Cancelled,
            ..
        }
    );
    assert!(error.to_string().starts_with("could not list services: rate limit timeout"));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_concurrent_callers_share_one_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/svc-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::service_json("svc-1", "checkout"))
                .set_delay(Duration::from_millis(20)),
        )
        .expect(8)
        .mount(&mock_server)
        .await;

    let client = common::test_client(mock_server.uri());
    let started = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.services().get("svc-1").await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Serialized: eight 20ms responses cannot overlap.
    assert!(started.elapsed() >= Duration::from_millis(160));
    mock_server.verify().await;
}
