pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod knowledge_base;
pub mod models;
pub mod prediction;
pub mod ranking;
pub mod scoring;
pub mod session;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::engine::SymptomEngine;
use crate::error::StartupError;

/// Load configuration and knowledge, then serve the HTTP API until Ctrl-C.
pub fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = EngineConfig::from_env()?;
    let loaded = knowledge_base::load_from_path(&config.knowledge_base_path)?;
    let knowledge_base = Arc::new(loaded.knowledge_base);

    // The remote client is blocking; it must be built, and later dropped,
    // outside the async runtime.
    let backend = prediction::build_backend(&config, Arc::clone(&knowledge_base))?;
    let engine = Arc::new(
        SymptomEngine::new(Arc::new(loaded.catalog), knowledge_base, backend)
            .with_default_k(config.default_k)?,
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let served = runtime.block_on(serve(Arc::clone(&engine), &config));
    drop(runtime);

    tracing::info!("{} stopped", config::APP_NAME);
    served
}

async fn serve(engine: Arc<SymptomEngine>, config: &EngineConfig) -> Result<(), StartupError> {
    let server =
        api::start_api_server_on(engine, config.bind_addr, config.request_timeout).await?;
    tracing::info!(
        addr = %server.session.server_addr,
        backend = %config.backend,
        "Serving symptom API"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");
    server.stop().await;
    Ok(())
}
