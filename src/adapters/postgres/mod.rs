//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresProfileRepository` - `user_profiles` reads and column-scoped writes
//! - `PostgresPrivacyRequestRepository` / `PostgresWaitlistRepository` - append-only logs
//! - `PostgresReportReader` - `user_accessible_analyses` and ticker reference tables
//! - `PostgresCatalogReader` - subscription products and prices

mod catalog_reader;
mod privacy_request_repository;
mod profile_repository;
mod report_reader;
mod waitlist_repository;

pub use catalog_reader::PostgresCatalogReader;
pub use privacy_request_repository::PostgresPrivacyRequestRepository;
pub use profile_repository::PostgresProfileRepository;
pub use report_reader::PostgresReportReader;
pub use waitlist_repository::PostgresWaitlistRepository;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

/// Opens the connection pool.
///
/// Connections are established lazily so the server can start while the
/// database is still coming up.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_lazy(&config.url)
}
