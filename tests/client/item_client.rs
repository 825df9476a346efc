//! `ItemClient` against a live service.

use reqwest::StatusCode;

use reactive_items::client::{ClientError, ItemClient};
use reactive_items::http::ErrorBody;
use reactive_items::ItemPayload;

use crate::support::{harness, seed_descriptions};

fn payload(description: &str, price: f64) -> ItemPayload {
    ItemPayload {
        id: None,
        description: description.to_string(),
        price,
    }
}

#[tokio::test]
async fn retrieve_and_exchange_list_agree() {
    let h = harness().await;

    let retrieved = h.client.items().await.unwrap();
    assert_eq!(seed_descriptions(&retrieved), vec!["Apple Ipad", "Samsung Tab", "LG TV"]);

    let raw = h.client.exchange_items().await.unwrap();
    assert_eq!(raw.status, StatusCode::OK);
    assert!(raw.headers.contains_key("content-type"));
    let exchanged: Vec<reactive_items::Item> = raw.json().unwrap();
    assert_eq!(exchanged, retrieved);
}

#[tokio::test]
async fn retrieve_unknown_item_is_status_error() {
    let h = harness().await;
    let err = h.client.item("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    let raw = h.client.exchange_item("missing").await.unwrap();
    assert_eq!(raw.status, StatusCode::NOT_FOUND);
    assert!(raw.body.is_empty());
}

#[tokio::test]
async fn create_update_delete_round() {
    let h = harness().await;

    let created = h.client.create(&payload("Iphone X", 999.99)).await.unwrap();
    let id = created.id.clone().unwrap();

    let updated = h.client.update(&id, &payload("Iphone XS", 1099.99)).await.unwrap();
    assert_eq!(updated.id.as_deref(), Some(id.as_str()));
    assert_eq!(updated.price, 1099.99);

    h.client.delete(&id).await.unwrap();
    let raw = h.client.exchange_item(&id).await.unwrap();
    assert_eq!(raw.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exchange_create_exposes_created_status() {
    let h = harness().await;
    let raw = h.client.exchange_create(&payload("Pixel", 599.0)).await.unwrap();
    assert_eq!(raw.status, StatusCode::CREATED);
}

#[tokio::test]
async fn exchange_update_unknown_is_404() {
    let h = harness().await;
    let raw = h
        .client
        .exchange_update("missing", &payload("x", 1.0))
        .await
        .unwrap();
    assert_eq!(raw.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn runtime_exception_via_retrieve_and_exchange() {
    let h = harness().await;

    match h.client.runtime_exception().await {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            let body: ErrorBody = serde_json::from_str(&body).unwrap();
            assert_eq!(body.message, "RuntimeException Occurred");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    let raw = h.client.exchange_runtime_exception().await.unwrap();
    assert!(raw.is_server_error());
    let body: ErrorBody = raw.json().unwrap();
    assert_eq!(body.message, "RuntimeException Occurred");
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let client = ItemClient::new("http://127.0.0.1:1");
    let err = client.items().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn exchange_delete_is_ok_for_unknown_id() {
    let h = harness().await;
    let raw = h.client.exchange_delete("missing").await.unwrap();
    assert!(raw.is_success());
    assert_eq!(h.client.items().await.unwrap().len(), 3);
}
