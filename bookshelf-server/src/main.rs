// Bookshelf Server - Main entry point

use anyhow::{Context, Result};
use bookshelf_server::{app, AppState, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = Config::path_from_env();
    let config = Config::load_from(&config_path).context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting {} v{}", bookshelf_server::NAME, bookshelf_server::VERSION);
    if !config_path.exists() {
        warn!("Config file {} not found, using defaults", config_path.display());
    }

    let state = AppState::from_config(&config).with_context(|| {
        format!("Failed to open collection {}", config.books_file.display())
    })?;
    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!("Failed to create upload directory {}", config.upload_dir.display())
    })?;

    let addr = config.listen_addr()?;
    let router = app(state, config.max_upload_bytes);

    info!("Server listening on {}", addr);

    // Start server (Axum 0.6 API)
    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
