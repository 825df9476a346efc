use clap::Parser;
use reactive_items::client::{self, ItemClient};
use reactive_items::http;
use reactive_items::telemetry::init_tracing;
use reactive_items::ClientConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;
    let config = ClientConfig::parse();

    tracing::info!(service_url = %config.service_url, "item client starting");
    let app = client::router(ItemClient::new(config.service_url));
    http::serve(app, &config.bind).await?;
    Ok(())
}
