//! # IssueDesk Web Server
//!
//! Loads configuration, connects to MySQL, creates any missing tables, then
//! serves the issue tracker until Ctrl-C.
//!
//! ## Usage
//!
//! ```bash
//! SECRET_KEY=$(openssl rand -hex 32) cargo run -p issuedesk-api
//! ```

use issuedesk_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use issuedesk_shared::db::{pool, schema};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "issuedesk_api=debug,issuedesk_shared=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!(
        "IssueDesk v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let db = pool::create_pool(&config.database).await?;
    schema::bootstrap_schema(&db).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
