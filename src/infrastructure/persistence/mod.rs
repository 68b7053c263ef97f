//! Run repository implementations.
//!
//! - [`PgRunRepository`] - PostgreSQL storage via SQLx
//! - [`InMemoryRunRepository`] - process-local storage
//!
//! [`connect`] builds the connection pool from [`Config`] and [`MIGRATOR`]
//! embeds the schema in `migrations/`.

pub mod memory_run_repository;
pub mod pg_run_repository;

pub use memory_run_repository::InMemoryRunRepository;
pub use pg_run_repository::PgRunRepository;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::config::Config;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens a PostgreSQL pool using the pool settings from `config`.
///
/// # Errors
///
/// Returns an error if no connection can be established within
/// `db_connect_timeout` seconds.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
}
