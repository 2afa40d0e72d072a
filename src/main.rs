use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedhub::infrastructure::app::App;
use feedhub::infrastructure::config::{Config, LogFormat, Storage};
use feedhub::infrastructure::db::{check_connection, create_pool, migrate};
use feedhub::infrastructure::fetcher::HttpFeedFetcher;
use feedhub::infrastructure::http::serve;
use feedhub::infrastructure::repositories::Repositories;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("invalid configuration")?;

    // Initialize logging
    init_logging(config.log_format);

    tracing::info!("Starting feedhub on {}", config.listen_addr);

    let (repositories, pool) = match &config.storage {
        Storage::Memory => {
            tracing::warn!("Using in-memory storage, nothing survives a restart");
            (Repositories::in_memory(), None)
        }
        Storage::Postgres(url) => {
            let pool = create_pool(url)
                .await
                .context("failed to create database pool")?;
            check_connection(&pool)
                .await
                .context("database is not reachable")?;
            migrate(&pool).await.context("failed to apply migrations")?;
            tracing::info!("Database connection verified and schema up to date");

            let pool = Arc::new(pool);
            (Repositories::postgres(pool.clone()), Some(pool))
        }
    };

    let fetcher = Arc::new(HttpFeedFetcher::new(config.fetch_timeout)?);
    let app = App::build(&config, repositories, fetcher, pool);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    app.synchronizer.start();
    let served = serve(listener, app.router, shutdown_signal()).await;

    tracing::info!("HTTP server stopped, waiting for the synchronizer");
    app.synchronizer.stop().await;

    served.context("HTTP server failed")?;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "feedhub=debug,tower_http=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
    }
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
