//! Estimation API Server Binary
//!
//! This binary starts the HTTP API server for plans, baselines and
//! portfolio generation.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin estimation-api
//!
//! # Run with environment variables
//! ESTIMATION__PORT=8080 ESTIMATION__DATABASE_URL=postgres://... cargo run --bin estimation-api
//! ```
//!
//! # Environment Variables
//!
//! * `ESTIMATION__HOST` - Server host (default: 0.0.0.0)
//! * `ESTIMATION__PORT` - Server port (default: 8080)
//! * `ESTIMATION__DATABASE_URL` - PostgreSQL connection string
//! * `ESTIMATION__LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `ESTIMATION__RUN_MIGRATIONS` - Apply migrations on startup (default: true)
//! * `ESTIMATION__MAX_CONNECTIONS`, `ESTIMATION__MIN_CONNECTIONS`,
//!   `ESTIMATION__CONNECT_TIMEOUT_SECS` - Pool settings
//! * `LOG_FORMAT` - `json` for JSON log lines
//! * `RUST_LOG` - Overrides the log level with a full filter

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_estimation::EstimationService;
use infra_db::PostgresEstimationStore;
use interface_api::{config::ApiConfig, create_router};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, establishes the database
/// connection and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Estimation API Server"
    );

    let pool = infra_db::create_pool(config.database_config())
        .await
        .context("Failed to connect to database")?;

    if config.run_migrations {
        infra_db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let store = Arc::new(PostgresEstimationStore::new(pool));
    let service = EstimationService::new(store);
    let app = create_router(service, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level; `LOG_FORMAT=json` switches
/// to JSON lines.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
