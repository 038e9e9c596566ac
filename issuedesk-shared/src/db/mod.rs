/// Database layer for IssueDesk
///
/// # Modules
///
/// - `pool`: MySQL connection pool management with health checks
/// - `schema`: One-time schema bootstrap run before the server starts
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use issuedesk_shared::db::pool::{create_pool, DatabaseConfig};
/// use issuedesk_shared::db::schema::bootstrap_schema;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         database: "support_opp".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(&config).await?;
///     bootstrap_schema(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod schema;
