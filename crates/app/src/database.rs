//! Database connection management

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Opens the SQLite database, creating the file when it does not exist yet.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the database cannot be opened.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new().connect_with(options).await
}

/// Closes the pool. Idempotent; repeated calls are harmless.
pub async fn close(pool: &SqlitePool) {
    pool.close().await;
}
