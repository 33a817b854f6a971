//! Dealflow Workflow Server
//!
//! Serves workflow invocations and execution queries over HTTP.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dealflow_server::{
    config::{AppConfig, DatabaseConfig},
    db::{create_pool, queries::Schema},
    router::build_router,
    state::AppState,
};

const DEFAULT_LOG_FILTER: &str =
    "info,dealflow_server=debug,dealflow_engine=debug,tower_http=debug";

/// Initialize tracing/logging.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    // Config is read before tracing starts, so failures are reported after init
    let app_config = AppConfig::from_env();
    let db_config = DatabaseConfig::from_env();

    init_tracing(app_config.as_ref().map(|c| c.log_json).unwrap_or(false));

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Dealflow workflow server"
    );

    let app_config = app_config.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load app config, using defaults");
        AppConfig::default()
    });

    let db_config = db_config.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load database config, using defaults");
        DatabaseConfig::default()
    });

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        debug = app_config.debug,
        webhook_timeout_secs = app_config.webhook_timeout_secs,
        "Configuration loaded"
    );

    let schema = Schema::new(&db_config.schema).map_err(anyhow::Error::msg)?;
    let db_pool = create_pool(&db_config).await?;

    let addr: SocketAddr = app_config.bind_address().parse()?;
    let app = build_router(AppState::new(db_pool, schema, app_config));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
