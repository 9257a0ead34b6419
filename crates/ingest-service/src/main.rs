//! # Event Ingestion Service
//!
//! Binary entry point: loads configuration, builds the cache client, checks
//! the store is reachable, then holds the process open until shutdown.

use ingest_config::{EnvSource, ProcessEnv};
use ingest_service::{bootstrap, probe_cache, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    telemetry::init_tracing(&ProcessEnv.string_or("LOG_LEVEL", "info"));

    tracing::info!(
        version = ingest_service::VERSION,
        "Starting event ingestion service"
    );

    let service = bootstrap(&ProcessEnv)?;

    match probe_cache(service.cache.as_ref()).await {
        Ok(elapsed) => tracing::info!(?elapsed, "Cache reachable"),
        Err(e) => tracing::warn!(error = %e, "Cache probe failed, continuing"),
    }

    shutdown_signal().await;

    tracing::info!("Shut down gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
