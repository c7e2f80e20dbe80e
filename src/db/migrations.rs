use sqlx::{migrate::Migrator, Pool, Postgres};
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run all pending database migrations
///
/// The SQL files under `migrations/` are embedded at compile time. sqlx
/// records applied versions, so this is safe to run on every start.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");

    MIGRATOR.run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
