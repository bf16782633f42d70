pub mod api; // HTTP boundary
pub mod authorization; // Role gate
pub mod conditions;
pub mod config;
pub mod db;
pub mod error;
pub mod forums;
pub mod identity; // Bearer sessions
pub mod journal; // Symptom catalog + logs
pub mod messaging; // Messages + notifications
pub mod models;
pub mod stats; // Symptom and treatment aggregates
pub mod treatments;

#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

/// Errors that stop the server before or while it runs.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Initialize tracing from `RUST_LOG`, falling back to the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Run the server until Ctrl-C (or SIGTERM on Unix).
pub async fn run() -> Result<(), StartupError> {
    let settings = config::ServerConfig::from_env()?;
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    // Creates the file and applies migrations once; requests reconnect.
    db::open_database(&settings.db_path)?;

    let server = api::start_server(api::ApiContext::new(settings.db_path.clone()), settings.bind)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!(
        addr = %server.addr,
        session_ttl_hours = settings.session_ttl.map(|ttl| ttl.num_hours()),
        "Listening"
    );

    shutdown_signal().await;
    server.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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
