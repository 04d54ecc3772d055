//! Database initialization: connection pool, pragmas, and schema.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

const MEMORY_PATH: &str = ":memory:";

/// Open (creating if needed) the SQLite database at `db_path` and apply the schema.
///
/// `":memory:"` yields a single-connection pool so every query sees the same
/// in-memory database.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let (url, max_connections) = if db_path == MEMORY_PATH {
        ("sqlite::memory:".to_string(), 1)
    } else {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }
        (format!("sqlite:{}?mode=rwc", db_path), 5)
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&url)
        .await?;

    apply_schema(&pool).await?;

    info!(db_path, "Database ready");
    Ok(pool)
}

/// Apply `schema.sql`. Every statement is `IF NOT EXISTS`, so this is safe to rerun.
async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schema_sql = include_str!("schema.sql");

    let mut applied = 0usize;
    for statement in schema_sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
            applied += 1;
        }
    }

    debug!(statements = applied, "Schema applied");
    Ok(())
}

/// Foreign keys carry the catalog's integrity rules; WAL and busy_timeout let
/// concurrent request handlers share the file.
async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    // journal_mode returns the mode actually set
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    debug!(journal_mode = %journal_mode, "SQLite journal mode");

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}
