use std::env;
#[cfg(feature = "postgres")]
use std::sync::Arc;
#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, ConnectionTrait, DbConn, DbErr, Statement};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Configuration for the blog database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            sqlx_logging: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` is required. `DB_MAX_CONNECTIONS`, `DB_MIN_CONNECTIONS`
    /// and `DB_SQLX_LOGGING` fall back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let mut config = Self::new(url);

        if let Some(value) = lookup("DB_MAX_CONNECTIONS") {
            config.max_connections = parse_u32("DB_MAX_CONNECTIONS", value)?;
        }
        if let Some(value) = lookup("DB_MIN_CONNECTIONS") {
            config.min_connections = parse_u32("DB_MIN_CONNECTIONS", value)?;
        }
        if let Some(value) = lookup("DB_SQLX_LOGGING") {
            config.sqlx_logging = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(config)
    }
}

fn parse_u32(key: &'static str, value: String) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

/// Connection pool handle shared by every repository.
///
/// Cloning is cheap; clones share the same pool.
#[cfg(feature = "postgres")]
#[derive(Clone)]
pub struct Database {
    conn: Arc<DbConn>,
}

#[cfg(feature = "postgres")]
impl Database {
    /// Open the pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(config.sqlx_logging)
            .to_owned();

        let conn = sea_orm::Database::connect(opts).await?;
        tracing::info!(pool = config.max_connections, "Database connected");

        Ok(Self::from_conn(conn))
    }

    /// Wrap an existing connection, e.g. a `MockDatabase` in tests.
    pub fn from_conn(conn: DbConn) -> Self {
        Self {
            conn: Arc::new(conn),
        }
    }

    pub fn conn(&self) -> &DbConn {
        &self.conn
    }

    /// Another handle on the same pool, for handing to a repository.
    pub fn shared(&self) -> Arc<DbConn> {
        Arc::clone(&self.conn)
    }

    /// Check connectivity with a trivial query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn
            .execute(Statement::from_string(
                self.conn.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
