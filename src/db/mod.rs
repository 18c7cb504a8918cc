/// Database layer
///
/// This module owns the process-wide PostgreSQL connection pool. Handlers
/// obtain the shared pool through [`pool::get_pool`] and never hold a
/// connection across unrelated requests.
///
/// # Example
///
/// ```no_run
/// use matrix_sql_server::db;
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = db::get_pool().await;
/// let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod pool;

pub use pool::{close_pool, get_pool, init_pool, DbConfig};
