use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;

use crate::data::repositories::StoreError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA_SQL: &str =
    include_str!("../migrations/2025-06-01-000000_create_review_tables/up.sql");

/// Applied to every connection the pool opens.
///
/// Word ids come from the catalog service and are not checked here, so the
/// foreign key enforcement diesel enables on connect is switched back off.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = OFF; PRAGMA busy_timeout = {};",
            self.busy_timeout_ms
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

pub fn create_pool(
    database_url: &str,
    max_size: u32,
    busy_timeout_ms: u32,
) -> Result<DbPool, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions { busy_timeout_ms }))
        .build(manager)?;
    Ok(pool)
}

/// Single-connection pool over a private in-memory database, schema applied.
pub fn in_memory_pool() -> Result<DbPool, StoreError> {
    let pool = create_pool(":memory:", 1, 0)?;
    run_migrations(&pool)?;
    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), StoreError> {
    let mut conn = pool.get()?;
    conn.batch_execute(SCHEMA_SQL)?;
    Ok(())
}
