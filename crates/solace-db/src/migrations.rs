//! # Database Migrations
//!
//! Embedded schema migrations. SQL files live under `migrations/sqlite/` at
//! the workspace root and are compiled into the binary, so a deployed app
//! never depends on loose files on disk.
//!
//! ## Current Schema
//! ```text
//! credential_vault   - single row (id = 1): account, PIN hash, sealed secret
//! pending_actions    - FIFO outbox of actions awaiting delivery
//! settings           - key/value store (sync mode, device id)
//! ```

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrator, populated at compile time.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations against the given pool.
///
/// Idempotent: already-applied migrations are skipped via sqlx's
/// `_sqlx_migrations` bookkeeping table.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
