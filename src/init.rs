//! One-shot startup sequence for the item service.
//!
//! Order is fixed: seed the item collection, then recreate the capped
//! collection, then start the capped producer. Each step can be switched off
//! through [`ServiceConfig`].

use std::sync::Arc;

use thiserror::Error;

use crate::config::{ConfigError, ServiceConfig};
use crate::document::Item;
use crate::error::RepositoryError;
use crate::producer::CappedProducer;
use crate::repository::{CappedItemRepository, CappedOptions, ItemRepository};

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("startup data setup failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// The items written to the collection on startup.
pub fn seed_items() -> Vec<Item> {
    vec![
        Item::new("Apple Ipad", 350.0),
        Item::new("Samsung Tab", 450.0),
        Item::new("LG TV", 850.0),
    ]
}

pub struct DataInitializer {
    items: Arc<dyn ItemRepository>,
    capped: Arc<dyn CappedItemRepository>,
}

impl DataInitializer {
    pub fn new(items: Arc<dyn ItemRepository>, capped: Arc<dyn CappedItemRepository>) -> Self {
        Self { items, capped }
    }

    /// Run every enabled step. Returns the producer handle when one was started;
    /// the caller keeps it alive for as long as records should be produced.
    pub async fn run(&self, config: &ServiceConfig) -> Result<Option<CappedProducer>, InitError> {
        let options = config.capped_options()?;

        if config.seed {
            self.seed().await?;
        }
        if config.recreate_capped {
            self.recreate_capped(options).await?;
        }

        Ok(config
            .producer_interval()
            .map(|interval| CappedProducer::spawn(Arc::clone(&self.capped), interval)))
    }

    /// Replace the item collection with [`seed_items`].
    pub async fn seed(&self) -> Result<Vec<Item>, RepositoryError> {
        self.items.delete_all().await?;
        for item in seed_items() {
            self.items.save(item).await?;
        }
        let items = self.items.find_all().await?;
        for item in &items {
            tracing::info!(?item, "Item inserted on startup");
        }
        Ok(items)
    }

    /// Drop the capped collection (ending any open tails) and create it again
    /// with the given bounds. Prior stream history is discarded.
    pub async fn recreate_capped(&self, options: CappedOptions) -> Result<(), RepositoryError> {
        let existed = self.capped.drop_collection().await?;
        self.capped.create_collection(options).await?;
        tracing::info!(
            existed,
            max_documents = options.max_documents,
            max_bytes = options.max_bytes,
            "capped collection recreated"
        );
        Ok(())
    }
}
