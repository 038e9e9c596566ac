/// Configuration management for the web server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `MYSQL_HOST`, `MYSQL_PORT` (3306), `MYSQL_USER`, `MYSQL_PASSWORD`, `MYSQL_DATABASE`
/// - `DATABASE_URL`: Full `mysql://` URL, overrides the `MYSQL_*` parts
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 10000)
/// - `SECRET_KEY`: Session signing key, at least 32 characters (required)
/// - `SESSION_TTL_HOURS`: Session lifetime (default: 168)
/// - `SECURE_COOKIES`: Mark cookies `Secure` and send HSTS (default: false)
/// - `KNOWLEDGE_ARTICLES`: Send users to the article form after closing an issue (default: true)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
///
/// # Example
///
/// ```no_run
/// use issuedesk_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use issuedesk_shared::auth::session::DEFAULT_SESSION_TTL_HOURS;
use issuedesk_shared::db::pool::DatabaseConfig;
use std::env;

/// Minimum accepted length of `SECRET_KEY`
pub const MIN_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session configuration
    pub session: SessionConfig,

    /// Optional behavior
    pub features: FeatureConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Whether the site is served over HTTPS
    ///
    /// Adds the `Secure` attribute to cookies and enables HSTS.
    pub secure_cookies: bool,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key used to sign session tokens
    ///
    /// IMPORTANT: Must be kept secret and be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// How long a session token stays valid
    pub ttl_hours: i64,
}

/// Optional behavior switches
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// After closing an issue, redirect to the knowledge article form
    /// instead of the issue list
    pub knowledge_articles: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,

    /// One JSON object per event
    Json,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `SECRET_KEY` is missing or shorter than 32 characters
    /// - A numeric or boolean variable has an invalid value
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "10000")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("PORT must be a port number: {}", e))?;

        let mysql_port = var("MYSQL_PORT", "3306")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("MYSQL_PORT must be a port number: {}", e))?;

        let max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be a number: {}", e))?;

        let secret = lookup("SECRET_KEY")
            .ok_or_else(|| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;

        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SECRET_KEY must be at least {} characters long", MIN_SECRET_LEN);
        }

        let ttl_hours = var("SESSION_TTL_HOURS", &DEFAULT_SESSION_TTL_HOURS.to_string())
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("SESSION_TTL_HOURS must be a number: {}", e))?;

        if ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS must be positive");
        }

        let log_format = match var("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        };

        Ok(Self {
            server: ServerConfig {
                host: var("HOST", "0.0.0.0"),
                port,
                secure_cookies: parse_bool("SECURE_COOKIES", &var("SECURE_COOKIES", "false"))?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL"),
                host: var("MYSQL_HOST", "localhost"),
                port: mysql_port,
                username: var("MYSQL_USER", "root"),
                password: var("MYSQL_PASSWORD", ""),
                database: var("MYSQL_DATABASE", "support_opp"),
                max_connections,
                ..Default::default()
            },
            session: SessionConfig { secret, ttl_hours },
            features: FeatureConfig {
                knowledge_articles: parse_bool(
                    "KNOWLEDGE_ARTICLES",
                    &var("KNOWLEDGE_ARTICLES", "true"),
                )?,
            },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be a boolean, got '{}'", key, other),
    }
}
