//! Command-line / environment configuration for both binaries.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::repository::CappedOptions;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Item service settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "items-service", about = "Item CRUD service with a capped-collection stream")]
pub struct ServiceConfig {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "ITEMS_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Replace the item collection with the seed set on startup.
    #[arg(long, env = "ITEMS_SEED", default_value_t = true, action = clap::ArgAction::Set)]
    pub seed: bool,

    /// Drop and recreate the capped collection on startup.
    #[arg(long, env = "ITEMS_RECREATE_CAPPED", default_value_t = true, action = clap::ArgAction::Set)]
    pub recreate_capped: bool,

    /// Maximum number of records the capped collection retains.
    #[arg(long, env = "ITEMS_CAPPED_MAX_DOCUMENTS", default_value_t = 20)]
    pub capped_max_documents: usize,

    /// Maximum total serialized size of the capped collection, in bytes.
    #[arg(long, env = "ITEMS_CAPPED_MAX_BYTES", default_value_t = 50_000)]
    pub capped_max_bytes: usize,

    /// Interval between records appended by the background producer.
    /// Zero disables the producer.
    #[arg(long, env = "ITEMS_PRODUCER_INTERVAL_MS", default_value_t = 1_000)]
    pub producer_interval_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            seed: true,
            recreate_capped: true,
            capped_max_documents: 20,
            capped_max_bytes: 50_000,
            producer_interval_ms: 1_000,
        }
    }
}

impl ServiceConfig {
    /// Capped collection bounds, validated.
    pub fn capped_options(&self) -> Result<CappedOptions, ConfigError> {
        if self.capped_max_documents == 0 {
            return Err(ConfigError::Invalid(
                "capped_max_documents must be greater than zero".into(),
            ));
        }
        if self.capped_max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "capped_max_bytes must be greater than zero".into(),
            ));
        }
        Ok(CappedOptions::new(
            self.capped_max_documents,
            self.capped_max_bytes,
        ))
    }

    pub fn producer_interval(&self) -> Option<Duration> {
        (self.producer_interval_ms > 0).then(|| Duration::from_millis(self.producer_interval_ms))
    }
}

/// Item client settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "items-client", about = "Pass-through HTTP client for the item service")]
pub struct ClientConfig {
    /// Address to bind the client's own HTTP server to.
    #[arg(long, env = "ITEMS_CLIENT_BIND", default_value = "0.0.0.0:8081")]
    pub bind: String,

    /// Base URL of the item service.
    #[arg(long, env = "ITEMS_SERVICE_URL", default_value = "http://localhost:8080")]
    pub service_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8081".to_string(),
            service_url: "http://localhost:8080".to_string(),
        }
    }
}
