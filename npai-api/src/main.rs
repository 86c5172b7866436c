//! NeuraPeace AI backend (npai-api) - Main entry point
//!
//! Wires the configured repository and generator backend into the HTTP
//! router and serves until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use npai_api::api::{create_router, AppContext};
use npai_api::config::{Args, Config};
use npai_api::generator::llm::LlmClient;
use npai_api::generator::mock::MockGenerator;
use npai_api::generator::Generator;
use npai_api::storage::{DbStorage, MemStorage, Storage};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "npai_api=debug,npai_common=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::resolve(args).context("Failed to resolve configuration")?;

    info!("Starting NeuraPeace AI backend on port {}", config.port);

    // Repository: SQLite by default, in-memory for development
    let storage: Arc<dyn Storage> = if config.in_memory {
        info!("Using in-memory storage");
        Arc::new(MemStorage::new())
    } else {
        let pool = npai_common::db::init_database(&config.database_path)
            .await
            .context("Failed to initialize database")?;
        Arc::new(DbStorage::new(pool))
    };

    // Generator backend: LLM when a key is configured, randomized mocks
    // otherwise (development mode)
    let generator = match config.openai_api_key.clone() {
        Some(api_key) => {
            info!("Content generators using LLM backend");
            Arc::new(Generator::Llm(
                LlmClient::new(api_key, config.openai_base_url.clone())
                    .context("Failed to create LLM client")?,
            ))
        }
        None => {
            info!("No API key configured; content generators using randomized mocks");
            Arc::new(Generator::Mock(MockGenerator::new()))
        }
    };

    let ctx = AppContext::new(storage, generator);
    let app = create_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
