use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Connection options shared by the server pool and the test pools.
///
/// The `REFERENCES` clauses in the schema are declarative only. Deleting a
/// bookmark or tag leaves its `bookmark_tag` rows behind, so foreign key
/// enforcement (on by default in sqlx) is switched off.
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(false))
}

pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    // Ensure data directory exists
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options(database_url)?)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("database ready at {database_url}");
    Ok(pool)
}
