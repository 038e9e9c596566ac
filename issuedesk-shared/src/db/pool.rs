/// Database connection pool management
///
/// Every request borrows a connection from one shared `MySqlPool` instead of
/// opening its own. sqlx returns the connection to the pool when the query
/// future completes or is dropped, so no handler path can leak one.
///
/// # Example
///
/// ```no_run
/// use issuedesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         host: "db.internal".to_string(),
///         username: "support".to_string(),
///         password: "secret".to_string(),
///         database: "support_opp".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(&config).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT ?")
///         .bind(42i64)
///         .fetch_one(&pool)
///         .await?;
///
///     Ok(())
/// }
/// ```

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection pool
///
/// Connection details are kept as separate fields rather than a URL so that
/// passwords containing `@`, `:` or `/` need no escaping. When `url` is set
/// it takes precedence over the individual fields.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full `mysql://` URL; overrides host/port/username/password/database
    pub url: Option<String>,

    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Database user
    pub username: String,

    /// Database password (may be empty)
    pub password: String,

    /// Database (schema) name
    pub database: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections to maintain
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,

    /// How long a connection can remain idle before being closed (seconds)
    ///
    /// None = connections never closed due to idle time
    pub idle_timeout_seconds: Option<u64>,

    /// Maximum lifetime of a connection before forced recycling (seconds)
    ///
    /// MySQL drops connections idle longer than `wait_timeout` (8h by
    /// default), so this should stay well below that.
    pub max_lifetime_seconds: Option<u64>,

    /// Whether to ping connections before handing them out
    pub test_before_acquire: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 3306,
            username: "root".to_string(),
            password: String::new(),
            database: "support_opp".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
            test_before_acquire: true,
        }
    }
}

impl DatabaseConfig {
    /// Builds driver connect options from this configuration
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Configuration` if `url` is set but malformed
    pub fn connect_options(&self) -> Result<MySqlConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return MySqlConnectOptions::from_str(url);
        }

        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(&self.database);

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        Ok(options)
    }

    /// A log-safe description of the target database
    pub fn describe(&self) -> String {
        match &self.url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}@{}:{}/{}", self.username, self.host, self.port, self.database),
        }
    }

    fn pool_options(&self) -> MySqlPoolOptions {
        let mut pool_options = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_seconds))
            .test_before_acquire(self.test_before_acquire);

        if let Some(idle_timeout) = self.idle_timeout_seconds {
            pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
            debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
        }

        if let Some(max_lifetime) = self.max_lifetime_seconds {
            pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
            debug!(max_lifetime_seconds = max_lifetime, "Set max lifetime");
        }

        pool_options
    }
}

/// Creates a MySQL connection pool and verifies connectivity
///
/// # Errors
///
/// Returns an error if:
/// - The configuration cannot be turned into connect options
/// - Cannot connect to the database
/// - Health check fails
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    info!(
        target_db = %config.describe(),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        connect_timeout_seconds = config.connect_timeout_seconds,
        "Creating database connection pool"
    );

    let pool = config
        .pool_options()
        .connect_with(config.connect_options()?)
        .await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Creates a pool without opening any connection
///
/// Connections are established on first use and no idle connections are
/// kept warm. Useful for tests that must prove a code path never touches
/// the database.
///
/// # Errors
///
/// Returns `sqlx::Error::Configuration` if `url` is set but malformed
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    Ok(config
        .pool_options()
        .min_connections(0)
        .connect_lazy_with(config.connect_options()?))
}

/// Performs a health check on the database connection
///
/// # Errors
///
/// Returns an error if the health check query fails
pub async fn health_check(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i64,) = sqlx::query_as("SELECT CAST(1 AS SIGNED)")
        .fetch_one(pool)
        .await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Gracefully closes the connection pool
///
/// Called on shutdown after the listener has stopped accepting requests.
pub async fn close_pool(pool: MySqlPool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.port, 3306);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout_seconds, 30);
        assert_eq!(config.idle_timeout_seconds, Some(600));
        assert_eq!(config.max_lifetime_seconds, Some(1800));
        assert!(config.test_before_acquire);
        assert!(config.url.is_none());
    }

    #[test]
    fn test_describe_hides_password() {
        let config = DatabaseConfig {
            username: "support".to_string(),
            password: "Abhi@1289".to_string(),
            ..Default::default()
        };

        let described = config.describe();
        assert_eq!(described, "support@localhost:3306/support_opp");
        assert!(!described.contains("Abhi"));
    }

    #[test]
    fn test_url_overrides_parts() {
        let config = DatabaseConfig {
            url: Some("mysql://u:p@db.example:3307/other".to_string()),
            ..Default::default()
        };

        assert!(config.connect_options().is_ok());
        assert_eq!(config.describe(), "DATABASE_URL");
    }

    #[test]
    fn test_malformed_url_is_rejected() {
        let config = DatabaseConfig {
            url: Some("not a url".to_string()),
            ..Default::default()
        };

        assert!(config.connect_options().is_err());
    }

    #[tokio::test]
    async fn test_lazy_pool_opens_no_connections() {
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..Default::default()
        };

        let pool = create_lazy_pool(&config).expect("Lazy pool should build");
        assert_eq!(pool.size(), 0);
    }
}
