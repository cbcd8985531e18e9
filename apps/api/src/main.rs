mod catalog;
mod config;
mod draft;
mod errors;
mod export;
mod persistence;
mod routes;
mod state;
mod store;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::draft::ResumeDraft;
use crate::export::JsonFileExporter;
use crate::persistence::{load_draft, DebouncedSaver, FileStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ingest::DataUrlDecoder;
use crate::store::FormStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Local durable store; the draft is read once at startup
    let kv = Arc::new(FileStore::new(&config.data_dir));
    info!("Draft storage at {}", kv.root().display());
    let initial = load_draft(kv.as_ref(), &config.storage_key, ResumeDraft::empty());

    let saver = DebouncedSaver::new(kv, config.storage_key.clone(), config.persist_debounce);
    info!("Auto-save debounce: {:?}", config.persist_debounce);
    let store = Arc::new(FormStore::new(initial, saver, Arc::new(DataUrlDecoder)));

    let exporter = Arc::new(JsonFileExporter::new(&config.export_dir));
    info!("Exports go to {}", config.export_dir.display());

    let state = AppState {
        store: Arc::clone(&store),
        exporter,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // form is served from another origin in dev

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if store.flush().await {
        info!("Flushed pending draft before exit");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
