//! Forecourt server binary.
//!
//! Loads configuration, wires the adapters to the conversation flow and
//! serves the webhook endpoints.

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use forecourt::adapters::catalog::{CachedCatalog, HttpVehicleSource};
use forecourt::adapters::http::{webhook_routes, WebhookState};
use forecourt::adapters::messaging::UazapiMessenger;
use forecourt::adapters::storage::InMemoryConversationStore;
use forecourt::application::ProcessInboundHandler;
use forecourt::config::AppConfig;
use forecourt::domain::conversation::{StageRouter, StoreFront};
use forecourt::ports::{ConversationStore, Messenger, VehicleCatalog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::new());
    let messenger: Arc<dyn Messenger> = Arc::new(UazapiMessenger::new(config.messaging.clone()));
    let catalog: Arc<dyn VehicleCatalog> = Arc::new(CachedCatalog::new(
        HttpVehicleSource::new(config.catalog.inventory_url.clone()),
        config.catalog.cache_ttl(),
    ));
    let router = StageRouter::new(StoreFront {
        name: config.store_front.name.clone(),
        address: config.store_front.address.clone(),
        opening_hours: config.store_front.opening_hours.clone(),
    });

    let processor = Arc::new(ProcessInboundHandler::new(store, messenger, catalog, router));
    let state = WebhookState::new(processor, config.store_front.name.clone());

    let app = webhook_routes(state).layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, bot = %config.store_front.name, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
