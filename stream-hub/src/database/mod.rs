//! SQLite storage for streams, health checks and segments.
//!
//! One pool serves every operation. Status changes run inside
//! `BEGIN IMMEDIATE` transactions so the version check and the write happen
//! under the same lock.

pub mod models;
pub mod repositories;
pub mod retry;
pub mod time;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use std::time::Duration;

pub type DbPool = Pool<Sqlite>;

/// Upper bound for the CPU-derived pool size.
const DEFAULT_POOL_SIZE: u32 = 10;

/// How long a connection waits on another writer before `SQLITE_BUSY`.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Negative: KiB rather than pages.
const DEFAULT_CACHE_SIZE_KB: i32 = -16000;

const DEFAULT_WAL_AUTOCHECKPOINT_PAGES: i32 = 1000;

async fn apply_per_connection_pragmas(
    conn: &mut sqlx::SqliteConnection,
) -> Result<(), sqlx::Error> {
    let pragmas = [
        format!("PRAGMA wal_autocheckpoint = {DEFAULT_WAL_AUTOCHECKPOINT_PAGES}"),
        format!("PRAGMA cache_size = {DEFAULT_CACHE_SIZE_KB}"),
        "PRAGMA temp_store = MEMORY".to_string(),
    ];
    for pragma in &pragmas {
        sqlx::query(pragma).execute(&mut *conn).await?;
    }
    Ok(())
}

async fn ensure_wal_mode(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let row = sqlx::query("PRAGMA journal_mode")
        .fetch_one(&mut *conn)
        .await?;
    let mode: String = row.get(0);
    // In-memory databases report "memory" and cannot switch to WAL.
    if mode != "wal" && mode != "memory" {
        tracing::warn!("journal_mode was '{}', expected 'wal'; re-setting", mode);
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Pool size used when the config does not name one: two connections per
/// core, capped at [`DEFAULT_POOL_SIZE`].
pub fn default_pool_size() -> u32 {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(2);
    (cores * 2).min(DEFAULT_POOL_SIZE)
}

/// Open the hub database at `database_url` (for example
/// `sqlite:stream_hub.db?mode=rwc`), creating the file when missing.
///
/// Connections run in WAL mode with foreign keys on, so `health_checks` and
/// `segments` rows cannot outlive their stream.
pub async fn init_pool_with_size(
    database_url: &str,
    max_connections: u32,
) -> Result<DbPool, sqlx::Error> {
    let connect_options = SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .after_connect(|conn, _meta| {
            Box::pin(async move { apply_per_connection_pragmas(&mut *conn).await })
        })
        .connect_with(connect_options)
        .await?;

    ensure_wal_mode(&pool).await?;

    tracing::debug!(
        max_connections,
        "Database pool initialized with WAL mode"
    );

    Ok(pool)
}

/// [`init_pool_with_size`] with [`default_pool_size`].
pub async fn init_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    init_pool_with_size(database_url, default_pool_size()).await
}

/// Create or upgrade the `streams`, `health_checks` and `segments` tables.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    tracing::debug!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::debug!("Database migrations completed");
    Ok(())
}

/// Take the write lock for a status change before reading the row version.
pub async fn begin_immediate(pool: &DbPool) -> Result<ImmediateTransaction, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
    Ok(ImmediateTransaction::new(conn))
}

/// Connection holding an open `BEGIN IMMEDIATE`.
///
/// Must end in [`commit`](Self::commit) or [`rollback`](Self::rollback).
/// If dropped first, the connection is closed rather than pooled, so SQLite
/// discards the half-done status change.
pub struct ImmediateTransaction {
    conn: sqlx::pool::PoolConnection<Sqlite>,
    finished: bool,
}

impl ImmediateTransaction {
    pub fn new(conn: sqlx::pool::PoolConnection<Sqlite>) -> Self {
        Self {
            conn,
            finished: false,
        }
    }

    pub async fn commit(mut self) -> Result<(), sqlx::Error> {
        sqlx::query("COMMIT").execute(&mut *self.conn).await?;
        self.finished = true;
        Ok(())
    }

    pub async fn rollback(mut self) -> Result<(), sqlx::Error> {
        sqlx::query("ROLLBACK").execute(&mut *self.conn).await?;
        self.finished = true;
        Ok(())
    }
}

impl std::ops::Deref for ImmediateTransaction {
    type Target = sqlx::SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl std::ops::DerefMut for ImmediateTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for ImmediateTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.conn.close_on_drop();
        }
    }
}
