use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DbConfig;

/// Builds the account store pool without opening a connection.
///
/// Connections are established on first acquire, so an unreachable store
/// surfaces as a failed request rather than a failed startup. The pool tests
/// each connection before handing it out and replaces closed ones.
pub fn connect_lazy(config: &DbConfig) -> PgPool {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .test_before_acquire(true)
        .connect_lazy_with(config.connect_options())
}
