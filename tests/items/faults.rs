//! Default fault rendering.

use axum::routing::get;
use axum::Router;

use reactive_items::http::{with_fault_handling, ErrorBody, REQUEST_ID_HEADER};

use crate::support::{seeded_service, start_server};

#[tokio::test]
async fn runtime_exception_renders_error_body() {
    let svc = seeded_service().await;
    let resp = svc
        .client
        .get(svc.url("/items/runtimeException"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let request_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.message, "RuntimeException Occurred");
    assert_eq!(body.status, 500);
    assert_eq!(body.error, "Internal Server Error");
    assert_eq!(body.path, "/items/runtimeException");
    assert_eq!(body.request_id, request_id);
    assert!(!body.timestamp.is_empty());
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let svc = seeded_service().await;
    let first = svc.client.get(svc.url("/items")).send().await.unwrap();
    let second = svc.client.get(svc.url("/items")).send().await.unwrap();
    let a = first.headers().get(REQUEST_ID_HEADER).unwrap().clone();
    let b = second.headers().get(REQUEST_ID_HEADER).unwrap().clone();
    assert_ne!(a, b);
}

async fn boom() -> &'static str {
    panic!("Runtime Error Occurred")
}

#[tokio::test]
async fn handler_panic_is_rendered_as_fault() {
    let app = with_fault_handling(Router::new().route("/boom", get(boom)));
    let base = start_server(app).await;

    let resp = reqwest::get(format!("{base}/boom")).await.unwrap();
    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.message, "Runtime Error Occurred");
    assert_eq!(body.path, "/boom");
}

#[tokio::test]
async fn successful_responses_are_untouched() {
    let svc = seeded_service().await;
    let resp = svc.client.get(svc.url("/items/ABC")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body.get("requestId").is_none());
    assert_eq!(body["description"], "Bose Headphones");
}
