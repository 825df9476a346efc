//! The client's own HTTP routes.

use serde_json::json;

use reactive_items::http::ErrorBody;
use reactive_items::{Item, ItemRepository};

use crate::support::{harness, seed_descriptions};

#[tokio::test]
async fn retrieve_and_exchange_routes_list_items() {
    let h = harness().await;
    for path in ["/client/retrieve", "/client/exchange"] {
        let resp = h.http.get(h.proxy_url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 200, "{path}");
        let items: Vec<Item> = resp.json().await.unwrap();
        assert_eq!(seed_descriptions(&items), vec!["Apple Ipad", "Samsung Tab", "LG TV"]);
    }
}

#[tokio::test]
async fn single_item_routes() {
    let h = harness().await;
    let id = h.id_of("LG TV").await;

    for prefix in ["/client/retrieve/singleItem", "/client/exchange/singleItem"] {
        let resp = h
            .http
            .get(h.proxy_url(&format!("{prefix}/{id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "{prefix}");
        let item: Item = resp.json().await.unwrap();
        assert_eq!(item.price, 850.0);

        let resp = h
            .http
            .get(h.proxy_url(&format!("{prefix}/missing")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404, "{prefix}");
    }
}

#[tokio::test]
async fn create_update_delete_routes() {
    let h = harness().await;

    let resp = h
        .http
        .post(h.proxy_url("/client/createItem"))
        .json(&json!({ "description": "Iphone X", "price": 999.99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Item = resp.json().await.unwrap();
    let id = created.id.unwrap();

    let resp = h
        .http
        .put(h.proxy_url(&format!("/client/updateItem/{id}")))
        .json(&json!({ "description": "Iphone X", "price": 899.99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Item = resp.json().await.unwrap();
    assert_eq!(updated.price, 899.99);

    let resp = h
        .http
        .put(h.proxy_url("/client/updateItem/missing"))
        .json(&json!({ "description": "x", "price": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = h
        .http
        .delete(h.proxy_url(&format!("/client/deleteItem/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(h.items.find_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn error_routes_surface_upstream_message() {
    let h = harness().await;
    for path in ["/client/retrieve/error", "/client/exchange/error"] {
        let resp = h.http.get(h.proxy_url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 500, "{path}");

        let body: ErrorBody = resp.json().await.unwrap();
        assert_eq!(body.path, path);
        let upstream: ErrorBody = serde_json::from_str(&body.message).unwrap();
        assert_eq!(upstream.message, "RuntimeException Occurred");
        assert_eq!(upstream.path, "/items/runtimeException");
    }
}
