//! Learngate entitlement HTTP server.
//!
//! Wires the PostgreSQL stores, the notification sink, and the Axum router
//! into one binary.

mod config;
mod notifier;

use config::Config;
use learngate_entitlements::config::QuotaPolicy;
use learngate_entitlements::stores::postgres::{PostgresCatalog, PostgresTicketStore};
use learngate_entitlements::Environment;
use learngate_web::{router, AppState};
use notifier::Notifier;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "learngate=info,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Learngate entitlement server");

    // Load configuration
    let config = Config::from_env();
    info!(
        host = %config.server.host,
        port = config.server.port,
        smtp = config.smtp.host.is_some(),
        "Configuration loaded"
    );

    // Connect to PostgreSQL
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
        .connect(&config.database.url)
        .await?;

    // Run migrations
    let tickets = PostgresTicketStore::new(pool.clone());
    tickets.migrate().await?;
    info!("Database ready");

    // Build the environment
    let catalog = PostgresCatalog::new(pool);
    let notifier = Notifier::from_config(&config.smtp);
    let quota = QuotaPolicy::new()
        .with_mocks_per_unit(config.quota.mocks_per_unit)
        .with_free_tier(config.quota.free_tier_mocks);
    let env = Environment::new(tickets, catalog, notifier).with_quota(quota);

    // Build router
    let app = router(Arc::new(AppState::new(env)));

    // Create server address
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for Ctrl+C (SIGINT) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
