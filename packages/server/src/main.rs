use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::NameRegistry;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::state::AppState;
use server::storage::build_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let store = build_store(&config.storage)
        .await
        .context("Failed to initialize name store")?;
    let registry = Arc::new(NameRegistry::new(store));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host/server.port")?;

    let state = AppState {
        registry: Arc::clone(&registry),
        config,
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(backend = registry.backend(), "Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down");
    if let Err(e) = registry.close().await {
        warn!(error = %e, "Failed to close name store cleanly");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
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
}
