//! Database initialization and cleanup utilities
//!
//! `run_migrations` applies `migrations/` through the sqlx migrator and is
//! what the server calls at startup. `init_database` and `cleanup_database`
//! execute the raw SQL files directly, which lets tests tear the schema down
//! and rebuild it.

use sqlx::migrate::MigrateError;
use sqlx::PgPool;
use std::fs;
use std::path::Path;

/// Apply pending migrations, recording them in `_sqlx_migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Initialize the database by executing migration files in ascending order
///
/// # Example
///
/// ```rust,no_run
/// use sqlx::PgPool;
/// use property_registry_postgres::repository::db_init::init_database;
///
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// init_database(pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    execute_sql_files_in_order(pool, &migrations_dir, true).await
}

/// Cleanup the database by executing cleanup files in descending order
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let cleanup_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cleanup");
    execute_sql_files_in_order(pool, &cleanup_dir, false).await
}

async fn execute_sql_files_in_order(
    pool: &PgPool,
    dir: &Path,
    ascending: bool,
) -> Result<(), sqlx::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(sqlx::Error::Io)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();

    entries.sort_by(|a, b| {
        let ordering = a.file_name().cmp(&b.file_name());
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });

    for entry in entries {
        let path = entry.path();
        let sql = fs::read_to_string(&path).map_err(sqlx::Error::Io)?;
        tracing::debug!(file = %path.display(), "executing sql file");
        sqlx::raw_sql(&sql).execute(pool).await?;
    }

    Ok(())
}
