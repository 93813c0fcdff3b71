use std::sync::Arc;

use courtyard_app::app::api::routes;
use courtyard_app::state::{CalendarHandler, CatalogProviderHandler};
use courtyard_core::config::load_config;
use courtyard_service::calendar::CalendarService;
use courtyard_service::catalog::{CatalogStore, MemoryCatalog};
use courtyard_service::clock::SystemClock;
use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Courtyard community portal");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let catalog = match &config.catalog.seed_path {
        Some(path) => MemoryCatalog::load(path).await?,
        None => {
            tracing::warn!("No catalog seed configured, starting with an empty catalog");
            MemoryCatalog::empty()
        }
    };
    let store: Arc<dyn CatalogStore> = Arc::new(catalog);

    let calendar = CalendarService::from_settings(&config.calendar)?;
    tracing::info!(offset = %calendar.offset(), "Calendar ready");

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(CatalogProviderHandler { store })
        .hoop(CalendarHandler {
            service: calendar,
            clock: Arc::new(SystemClock),
        })
        .push(routes()?);

    tracing::info!(origin = %config.server.origin(), "Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
