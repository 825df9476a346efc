use std::sync::Arc;

use clap::Parser;
use reactive_items::http::{self, AppState};
use reactive_items::telemetry::init_tracing;
use reactive_items::{DataInitializer, InMemoryCappedRepository, InMemoryItemRepository, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;
    let config = ServiceConfig::parse();

    let items = Arc::new(InMemoryItemRepository::new());
    let capped = Arc::new(InMemoryCappedRepository::new());

    // Held for the life of the server; dropping it stops the producer.
    let producer = DataInitializer::new(items.clone(), capped.clone())
        .run(&config)
        .await?;

    http::serve(http::router(AppState::new(items, capped)), &config.bind).await?;

    if let Some(producer) = producer {
        let stats = producer.stop().await;
        tracing::info!(?stats, "capped producer finished");
    }
    Ok(())
}
