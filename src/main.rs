//! Contacts Backend - Main entry point

use anyhow::Result;
use contacts_backend::client::{AsyncImageHost, AsyncImageHostImpl, ImageHostClient, RetryPolicy};
use contacts_backend::repositories::{ContactRepository, ImageRepository, InMemoryStore};
use contacts_backend::services::{
    ContactService, ContactServiceImpl, SearchService, SearchServiceImpl,
};
use contacts_backend::{AppState, Config, Metrics};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logging is not up yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Configuration loaded successfully");
    info!(
        "Starting Contacts Backend with image host {} (cloud: {})",
        config.image_host_url, config.image_host_cloud_name
    );

    let metrics = Metrics::new();

    // Initialize image host client
    let sync_client = ImageHostClient::new(&config, metrics.clone());
    let retry = RetryPolicy {
        max_retries: config.image_host_max_retries,
        ..RetryPolicy::default()
    };
    let host = Arc::new(AsyncImageHostImpl::new(sync_client, retry)) as Arc<dyn AsyncImageHost>;
    info!(
        "Image host timeout: {}s, retries: {}",
        config.image_host_timeout, retry.max_retries
    );

    // Initialize repositories
    let store = InMemoryStore::new();
    let contact_repo = Arc::new(store.clone()) as Arc<dyn ContactRepository>;
    let image_repo = Arc::new(store) as Arc<dyn ImageRepository>;

    // Initialize services
    let contact_service = Arc::new(ContactServiceImpl::new(
        contact_repo.clone(),
        image_repo,
        host,
        metrics.clone(),
    )) as Arc<dyn ContactService>;
    let search_service =
        Arc::new(SearchServiceImpl::new(contact_repo, metrics.clone())) as Arc<dyn SearchService>;

    let state = AppState {
        contact_service,
        search_service,
        metrics,
    };

    info!(
        "Request timeout: {:?}, max upload: {} bytes",
        Duration::from_secs(config.request_timeout),
        config.max_upload_bytes
    );

    if let Err(e) = contacts_backend::server::run_server(state, &config).await {
        error!("Server failed: {:#}", e);
        return Err(e);
    }

    info!("Contacts Backend shutdown complete");
    Ok(())
}
