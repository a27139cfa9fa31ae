//! Bookshelf - a small books CRUD service
//!
//! Serves create/list/update endpoints over a PostgreSQL `books` table with
//! an in-process TTL cache in front of the listing query.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::api::{create_router, AppState};
use bookshelf::config::Config;
use bookshelf::db::{connect_pool, InMemoryBookRepository, PgBookRepository};

/// Main entry point for the books server.
///
/// # Startup Sequence
/// 1. Load `.env` if present
/// 2. Initialize tracing subscriber for logging
/// 3. Load configuration from environment variables
/// 4. Build the connection pool (or the in-memory store)
/// 5. Create the listing cache and the Axum router
/// 6. Serve until SIGINT/SIGTERM, then close the pool
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_ttl={}s, db={}@{}:{}/{}, max_connections={}",
        config.server_port,
        config.cache_ttl,
        config.database.user,
        config.database.host,
        config.database.port,
        config.database.name,
        config.database.max_connections
    );

    let (state, pg) = if config.in_memory_store {
        warn!("Using in-memory store, data is lost on shutdown");
        (AppState::from_config(InMemoryBookRepository::new(), &config), None)
    } else {
        let repo = PgBookRepository::new(connect_pool(&config.database));
        info!("Database pool initialized");
        (AppState::from_config(repo.clone(), &config), Some(repo))
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server is running at {}", config.server_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(repo) = pg {
        repo.close().await;
        info!("Database pool closed");
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
