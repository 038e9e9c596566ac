/// Health check endpoint
///
/// Verifies that the server is running, the database answers, and the
/// schema is complete.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "missing_tables": []
/// }
/// ```
///
/// The status code is 200 either way; `status` is `degraded` when the
/// database is unreachable or a table is missing.

use crate::app::AppState;
use axum::{extract::State, Json};
use issuedesk_shared::db::{pool, schema};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,

    /// Schema tables that do not exist
    pub missing_tables: Vec<String>,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            false
        }
    };

    let missing_tables = if connected {
        match schema::missing_tables(&state.db).await {
            Ok(missing) => missing.into_iter().map(str::to_string).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Health check: schema query failed");
                schema::table_names().map(str::to_string).collect()
            }
        }
    } else {
        Vec::new()
    };

    let healthy = connected && missing_tables.is_empty();

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        missing_tables,
    })
}
