//! Integration tests for the HTTP surface: signature checks, request
//! validation order, and status mapping.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use tower::ServiceExt;

use zammad_slack_gateway::server::router;
use zammad_slack_gateway::server::signature::{sign, SIGNATURE_HEADER};

use super::test_helpers::{
    event_json, test_app_state, FakeGateway, FakeTicketStore, CHANNEL_NAME, SECRET,
};

struct Harness {
    gateway: Arc<FakeGateway>,
    store: Arc<FakeTicketStore>,
}

impl Harness {
    fn new() -> Self {
        Self {
            gateway: Arc::new(FakeGateway::new()),
            store: Arc::new(FakeTicketStore::new().with_ticket(42)),
        }
    }

    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        router(test_app_state(&self.gateway, &self.store))
            .oneshot(request)
            .await
            .expect("router responds")
    }

    async fn deliver(&self, uri: &str, body: &[u8]) -> StatusCode {
        let signature = sign(SECRET, body).expect("sign");
        self.send(webhook_request(uri, body.to_vec(), Some(&signature)))
            .await
            .status()
    }
}

fn webhook_request(uri: &str, body: Vec<u8>, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body)).expect("request builds")
}

fn event_body(ticket_id: u64, article_id: u64) -> Vec<u8> {
    serde_json::to_vec(&event_json(ticket_id, article_id)).expect("serialize event")
}

fn channel_uri() -> String {
    format!("/webhook?channel={CHANNEL_NAME}")
}

#[tokio::test]
async fn health_returns_ok() {
    let harness = Harness::new();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request builds");
    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("body");
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn valid_delivery_is_relayed() {
    let harness = Harness::new();
    let status = harness.deliver(&channel_uri(), &event_body(42, 1)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(harness.gateway.posts().len(), 2);
    assert!(harness.store.correlation(42).is_some());
}

#[tokio::test]
async fn redelivery_is_acknowledged_without_posting() {
    let harness = Harness::new();
    let body = event_body(42, 1);

    assert_eq!(harness.deliver(&channel_uri(), &body).await, StatusCode::OK);
    assert_eq!(harness.deliver(&channel_uri(), &body).await, StatusCode::OK);
    assert_eq!(harness.gateway.posts().len(), 2);
}

#[tokio::test]
async fn missing_signature_is_unauthorized() {
    let harness = Harness::new();
    let response = harness
        .send(webhook_request(&channel_uri(), event_body(42, 1), None))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(harness.gateway.posts().is_empty());
}

#[tokio::test]
async fn wrong_signature_is_unauthorized() {
    let harness = Harness::new();
    let body = event_body(42, 1);
    let signature = sign("some-other-secret", &body).expect("sign");
    let response = harness
        .send(webhook_request(&channel_uri(), body, Some(&signature)))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(harness.gateway.posts().is_empty());
    assert!(harness.store.updates().is_empty());
}

#[tokio::test]
async fn signature_of_a_different_body_is_unauthorized() {
    let harness = Harness::new();
    let signature = sign(SECRET, &event_body(42, 2)).expect("sign");
    let response = harness
        .send(webhook_request(&channel_uri(), event_body(42, 1), Some(&signature)))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_body_is_bad_request() {
    let harness = Harness::new();
    let response = harness
        .send(webhook_request(&channel_uri(), Vec::new(), Some("sha1=00")))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_channel_is_not_found() {
    let harness = Harness::new();
    let status = harness.deliver("/webhook", &event_body(42, 1)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(harness.gateway.posts().is_empty());
}

#[tokio::test]
async fn unknown_channel_is_not_found() {
    let harness = Harness::new();
    let status = harness
        .deliver("/webhook?channel=does-not-exist", &event_body(42, 1))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(harness.store.updates().is_empty());
}

#[tokio::test]
async fn signed_garbage_is_bad_request() {
    let harness = Harness::new();
    let status = harness.deliver(&channel_uri(), b"{\"ticket\": 1}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn article_of_another_ticket_is_bad_request() {
    let harness = Harness::new();
    let mut event = event_json(42, 1);
    event["article"]["ticket_id"] = serde_json::json!(43);
    let body = serde_json::to_vec(&event).expect("serialize");

    assert_eq!(harness.deliver(&channel_uri(), &body).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_ticket_is_server_error() {
    let harness = Harness::new();
    let status = harness.deliver(&channel_uri(), &event_body(7, 1)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(harness.gateway.posts().is_empty());
}

#[tokio::test]
async fn slack_rejection_is_server_error() {
    let harness = Harness::new();
    harness.gateway.fail_posts.store(true, Ordering::SeqCst);
    let status = harness.deliver(&channel_uri(), &event_body(42, 1)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(harness.store.updates().is_empty());
}

#[tokio::test]
async fn webhook_route_only_accepts_post() {
    let harness = Harness::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri(channel_uri())
        .body(Body::empty())
        .expect("request builds");

    assert_eq!(
        harness.send(request).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}
