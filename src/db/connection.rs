use std::time::Duration;

use anyhow::{anyhow, Context};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::config::DatabaseSettings;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Opens the connection pool. The pool lives until the returned value (and
/// every store holding a clone of it) is dropped.
pub fn init_pool(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let database_url = settings
        .url
        .as_deref()
        .context("database.url must be set for the postgres backend")?;

    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(settings.pool_size)
        .connection_timeout(Duration::from_secs(settings.timeout_seconds))
        .build(manager)
        .context("Failed to create connection pool")
}

pub fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    let conn = &mut pool.get().context("Failed to get connection from pool")?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;
    for version in applied {
        tracing::info!(%version, "Applied migration");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    const CREATE_PRODUCT_RECORDS: &str =
        include_str!("../../migrations/2024-05-01-000000_create_product_records/up.sql");

    #[test]
    fn labels_compare_bytewise() {
        assert!(CREATE_PRODUCT_RECORDS.contains(r#"label VARCHAR COLLATE "C""#));
    }
}
