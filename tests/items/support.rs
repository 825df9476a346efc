//! Test harness: in-memory repositories behind a real axum server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reactive_items::http::{self, AppState};
use reactive_items::{
    DataInitializer, InMemoryCappedRepository, InMemoryItemRepository, Item, ItemRepository,
    RepositoryError,
};

pub struct TestService {
    pub base: String,
    pub items: InMemoryItemRepository,
    pub client: reqwest::Client,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn all_items(&self) -> Vec<Item> {
        self.items.find_all().await.unwrap()
    }
}

/// Bind to port 0 and return the actual address.
pub async fn start_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Service seeded with the three startup items plus `ABC` / "Bose Headphones".
pub async fn seeded_service() -> TestService {
    let items = InMemoryItemRepository::new();
    let capped = InMemoryCappedRepository::new();
    DataInitializer::new(Arc::new(items.clone()), Arc::new(capped.clone()))
        .seed()
        .await
        .unwrap();
    items
        .save(Item::with_id("ABC", "Bose Headphones", 149.99))
        .await
        .unwrap();

    let base = start_server(http::router(AppState::new(Arc::new(items.clone()), Arc::new(capped)))).await;
    TestService {
        base,
        items,
        client: reqwest::Client::new(),
    }
}

/// Service over empty collections.
pub async fn empty_service() -> TestService {
    let items = InMemoryItemRepository::new();
    let base = start_server(http::router(AppState::new(
        Arc::new(items.clone()),
        Arc::new(InMemoryCappedRepository::new()),
    )))
    .await;
    TestService {
        base,
        items,
        client: reqwest::Client::new(),
    }
}

/// Item store whose `find_by_id` pauses before reading, and which records how
/// many lookups overlap.
#[derive(Clone)]
pub struct SlowLookups {
    inner: InMemoryItemRepository,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl SlowLookups {
    pub fn new(inner: InMemoryItemRepository, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Highest number of `find_by_id` calls seen running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemRepository for SlowLookups {
    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, RepositoryError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let found = self.inner.find_by_id(id).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        found
    }

    async fn find_by_description(&self, description: &str) -> Result<Option<Item>, RepositoryError> {
        self.inner.find_by_description(description).await
    }

    async fn save(&self, item: Item) -> Result<Item, RepositoryError> {
        self.inner.save(item).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError> {
        self.inner.delete_by_id(id).await
    }

    async fn delete_all(&self) -> Result<(), RepositoryError> {
        self.inner.delete_all().await
    }
}

/// Seeded service whose id lookups take `delay`.
pub async fn slow_lookup_service(delay: Duration) -> (TestService, SlowLookups) {
    let items = InMemoryItemRepository::new();
    items
        .save(Item::with_id("ABC", "Bose Headphones", 149.99))
        .await
        .unwrap();
    let slow = SlowLookups::new(items.clone(), delay);

    let base = start_server(http::router(AppState::new(
        Arc::new(slow.clone()),
        Arc::new(InMemoryCappedRepository::new()),
    )))
    .await;
    let svc = TestService {
        base,
        items,
        client: reqwest::Client::new(),
    };
    (svc, slow)
}
