/// Persistent scan storage
///
/// libsql (SQLite) tables behind the core's `ScanStore` trait.

pub mod migrations;
pub mod store;

pub use store::LibsqlScanStore;

use anyhow::Result;

/// Initialize database with schema
pub async fn initialize_database(conn: &libsql::Connection) -> Result<()> {
    migrations::run_migrations(conn).await
}
