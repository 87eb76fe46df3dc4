use anyhow::{Context, Result};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// How long a writer waits for the database lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        employee_id TEXT PRIMARY KEY NOT NULL,
        full_name   TEXT NOT NULL,
        email       TEXT NOT NULL UNIQUE,
        department  TEXT NOT NULL,
        created_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        employee_id TEXT NOT NULL REFERENCES employees (employee_id) ON DELETE CASCADE,
        date        TEXT NOT NULL,
        status      TEXT NOT NULL CHECK (status IN ('Present', 'Absent')),
        marked_at   TEXT NOT NULL,
        PRIMARY KEY (employee_id, date)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance (date)",
    "CREATE INDEX IF NOT EXISTS idx_employees_department ON employees (department)",
];

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid DATABASE_URL {database_url:?}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    create_schema(&pool).await?;
    Ok(pool)
}

/// Idempotent, safe to run on every start.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to create schema")?;
    }
    Ok(())
}

/// Write transaction opened with `BEGIN IMMEDIATE`.
///
/// The write lock is taken before the first read, so concurrent writers queue
/// on the busy timeout and every check-then-write runs against the latest
/// committed state. Close it with [`WriteTx::finish`]. If it is dropped while
/// still open, the connection is detached from the pool and closed, which
/// rolls the transaction back.
pub struct WriteTx {
    conn: Option<PoolConnection<Sqlite>>,
    open: bool,
}

impl WriteTx {
    pub async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(Self {
            conn: Some(conn),
            open: true,
        })
    }

    pub fn conn(&mut self) -> Result<&mut SqliteConnection, sqlx::Error> {
        self.conn.as_deref_mut().ok_or(sqlx::Error::PoolClosed)
    }

    /// Commits when `result` is `Ok`, rolls back otherwise, and hands `result`
    /// back.
    pub async fn finish<T, E>(mut self, result: Result<T, E>) -> Result<T, E>
    where
        E: From<sqlx::Error>,
    {
        let statement = if result.is_ok() { "COMMIT" } else { "ROLLBACK" };
        sqlx::query(statement).execute(self.conn()?).await?;
        self.open = false;
        result
    }
}

impl Drop for WriteTx {
    fn drop(&mut self) {
        if self.open {
            if let Some(conn) = self.conn.take() {
                warn!("Write transaction dropped while open; closing its connection");
                drop(conn.detach());
            }
        }
    }
}

/// Single-connection in-memory database; every extra connection would see its
/// own empty database.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    init_db("sqlite::memory:", 1)
        .await
        .expect("in-memory database")
}

/// File-backed database with several connections, for tests that need real
/// concurrent writers. Keep the returned directory alive for the pool's
/// lifetime.
#[cfg(test)]
pub async fn file_pool(max_connections: u32) -> (SqlitePool, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("hrms.db").display());
    let pool = init_db(&url, max_connections)
        .await
        .expect("file database");
    (pool, dir)
}
