use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use eyre::{Error, Result};

/// The async Postgres connection pool used across the application.
pub type DbPool = Pool<AsyncPgConnection>;

/// Builds the async connection pool.
///
/// # Arguments
/// * `database_url` - Postgres connection string
///
/// # Returns
/// * `Result<DbPool>` - The connection pool
///
/// # Errors
/// * If `database_url` is empty
/// * If pool construction fails
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    if database_url.is_empty() {
        return Err(Error::msg("DATABASE_URL must be set"));
    }

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(manager)
        .max_size(10)
        .build()
        .map_err(|e| Error::msg(format!("Failed to create connection pool: {e}")))
}
