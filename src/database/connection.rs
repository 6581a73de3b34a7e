use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub fn create_pool<P: AsRef<Path>>(database_path: P) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(database_path).with_init(enable_foreign_keys);

    r2d2::Pool::new(manager).context("Failed to create database pool")
}

/// Single-connection in-memory pool, used by tests
pub fn create_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(enable_foreign_keys);

    r2d2::Pool::builder()
        .max_size(1)
        .build(manager)
        .context("Failed to create in-memory database pool")
}

fn enable_foreign_keys(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}
