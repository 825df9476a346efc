use std::sync::Arc;

use reactive_items::client::{self, ItemClient};
use reactive_items::http::{self, AppState};
use reactive_items::{
    DataInitializer, InMemoryCappedRepository, InMemoryItemRepository, Item, ItemRepository,
};

pub struct Harness {
    /// Base URL of the client's proxy routes.
    pub proxy: String,
    pub items: InMemoryItemRepository,
    pub client: ItemClient,
    pub http: reqwest::Client,
}

impl Harness {
    pub fn proxy_url(&self, path: &str) -> String {
        format!("{}{}", self.proxy, path)
    }

    pub async fn id_of(&self, description: &str) -> String {
        self.items
            .find_by_description(description)
            .await
            .unwrap()
            .and_then(|item| item.id)
            .unwrap()
    }
}

async fn start_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Seeded item service plus a client router pointed at it.
pub async fn harness() -> Harness {
    let items = InMemoryItemRepository::new();
    let capped = InMemoryCappedRepository::new();
    DataInitializer::new(Arc::new(items.clone()), Arc::new(capped.clone()))
        .seed()
        .await
        .unwrap();

    let service = start_server(http::router(AppState::new(
        Arc::new(items.clone()),
        Arc::new(capped),
    )))
    .await;
    let client = ItemClient::new(service);
    let proxy = start_server(client::router(client.clone())).await;

    Harness {
        proxy,
        items,
        client,
        http: reqwest::Client::new(),
    }
}

pub fn seed_descriptions(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.description.as_str()).collect()
}
