//! Embedded schema migrations.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Apply all pending migrations.
pub async fn run(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
