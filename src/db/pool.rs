/// Shared database connection pool
///
/// Exactly one pool exists per process. It is created lazily on first
/// access, shared by every handler, and can be explicitly closed and later
/// rebuilt from fresh configuration. Construction never performs I/O
/// (`connect_lazy_with`), so a bad host or port surfaces as a per-query
/// acquire error instead of a startup failure.
///
/// # Example
///
/// ```no_run
/// use matrix_sql_server::db;
///
/// #[tokio::main]
/// async fn main() -> Result<(), sqlx::Error> {
///     let pool = db::get_pool().await;
///
///     let row: (i64,) = sqlx::query_as("SELECT $1")
///         .bind(42i64)
///         .fetch_one(&pool)
///         .await?;
///
///     db::close_pool().await;
///     Ok(())
/// }
/// ```

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::Executor;
use std::env;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Statement run on every new physical connection so unqualified table
/// references resolve across all world schemas.
pub const SEARCH_PATH_SQL: &str =
    r#"SET search_path TO public, "Cyberpunk", "Fantasy", "RealWorld""#;

/// Maximum number of connections in the pool
const MAX_CONNECTIONS: u32 = 10;

/// Timeout for acquiring a connection from the pool
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-wide pool slot.
///
/// The mutex guards the check-then-create step: the runtime is
/// multi-threaded, so two first accesses could otherwise both build a pool.
static POOL: Mutex<Option<PgPool>> = Mutex::const_new(None);

/// Database connection configuration
///
/// Built once from environment variables at first pool access; immutable
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Database user
    pub user: String,

    /// Database password
    pub password: String,

    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Whether to use TLS for the database connection
    ///
    /// Off unless `DB_SSL` is the literal `true` — default-secure-off for
    /// local development.
    pub ssl: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            database: "matrix_sql".to_string(),
            ssl: false,
        }
    }
}

impl DbConfig {
    /// Loads database configuration from environment variables
    ///
    /// Every value has a fallback default and nothing is validated here;
    /// a wrong host or port surfaces later as an asynchronous pool error.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            user: env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("DB_PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(5432),
            database: env::var("DB_DATABASE").unwrap_or_else(|_| "matrix_sql".to_string()),
            ssl: env::var("DB_SSL").as_deref() == Ok("true"),
        }
    }
}

fn connect_options(config: &DbConfig) -> PgConnectOptions {
    PgConnectOptions::new_without_pgpass()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
        .ssl_mode(if config.ssl {
            PgSslMode::Require
        } else {
            // Omit TLS entirely rather than letting sqlx negotiate it
            PgSslMode::Disable
        })
}

/// Builds the pool without connecting.
///
/// The `after_connect` hook runs on every new physical connection; a failed
/// search-path statement is logged and the connection stays in the pool
/// with the default search path.
fn build_pool(config: &DbConfig) -> PgPool {
    info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        ssl = config.ssl,
        max_connections = MAX_CONNECTIONS,
        "Creating database connection pool"
    );

    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                match conn.execute(SEARCH_PATH_SQL).await {
                    Ok(_) => {
                        debug!("Database search path set to include all schemas");
                    }
                    Err(err) => {
                        warn!(error = %err, "Failed to set database search path");
                    }
                }
                Ok(())
            })
        })
        .connect_lazy_with(connect_options(config))
}

/// Initializes the shared pool, or returns the existing one.
///
/// Idempotent first-writer-wins: if a pool already exists the supplied
/// configuration is ignored and the existing pool is returned unchanged.
/// Otherwise the pool is built from `config`, or from
/// [`DbConfig::from_env`] when `config` is `None`.
pub async fn init_pool(config: Option<DbConfig>) -> PgPool {
    let mut slot = POOL.lock().await;
    if let Some(pool) = slot.as_ref() {
        return pool.clone();
    }

    let config = config.unwrap_or_else(DbConfig::from_env);
    let pool = build_pool(&config);
    *slot = Some(pool.clone());
    pool
}

/// Returns the shared pool, creating it if absent.
pub async fn get_pool() -> PgPool {
    init_pool(None).await
}

/// Gracefully closes the shared pool and clears the slot.
///
/// A subsequent [`get_pool`] rebuilds the pool from fresh configuration.
/// No-op when no pool exists. The lock is held across the drain so a
/// concurrent `get_pool` cannot observe a half-closed pool.
pub async fn close_pool() {
    let mut slot = POOL.lock().await;
    if let Some(pool) = slot.take() {
        info!("Closing database connection pool");
        pool.close().await;
        info!("Database connection pool closed");
    }
}
