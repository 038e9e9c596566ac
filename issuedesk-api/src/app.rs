/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use issuedesk_api::{app::AppState, config::Config};
/// use issuedesk_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database).await?;
/// let state = AppState::new(pool, config);
/// let app = issuedesk_api::app::build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:10000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::AppError,
    middleware::{security::security_headers, session::require_session},
};
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::mysql::MySqlPool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Holds nothing mutable: the schema is bootstrapped before the router is
/// built, and all per-user state lives in cookies or the database.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: MySqlPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: MySqlPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Key used to sign and verify session tokens
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET       /health                          # JSON health check
/// ├── GET, POST /signup
/// ├── GET, POST /login
/// ├── GET       /logout
/// ├── GET       /restart_server                  # no-op, logs + flashes
/// └── session required (anonymous → 303 /login)
///     ├── GET       /                            # issue list
///     ├── GET       /issues                      # issue list
///     ├── GET, POST /report
///     ├── POST      /close_issue/:issue_id
///     └── GET, POST /knowledge_article/:issue_id
/// ```
///
/// # Middleware Stack
///
/// 1. Session gate (protected routes only, via `route_layer` so unknown
///    paths still 404)
/// 2. Logging (tower-http TraceLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/signup",
            get(routes::auth::signup_form).post(routes::auth::signup),
        )
        .route(
            "/login",
            get(routes::auth::login_form).post(routes::auth::login),
        )
        .route("/logout", get(routes::auth::logout))
        .route("/restart_server", get(routes::issues::restart_server));

    let protected_routes = Router::new()
        .route("/", get(routes::issues::index))
        .route("/issues", get(routes::issues::list_issues))
        .route(
            "/report",
            get(routes::issues::report_form).post(routes::issues::report_issue),
        )
        .route("/close_issue/:issue_id", post(routes::issues::close_issue))
        .route(
            "/knowledge_article/:issue_id",
            get(routes::knowledge::knowledge_article_form)
                .post(routes::knowledge::create_knowledge_article),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            security_headers,
        ))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("No such page".to_string())
}
