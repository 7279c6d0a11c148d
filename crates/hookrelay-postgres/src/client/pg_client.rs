//! Pooled PostgreSQL client.

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_migrations::MigrationHarness;

use super::PgConfig;
use crate::{MIGRATIONS, PgError, PgResult, TRACING_TARGET_CLIENT, TRACING_TARGET_MIGRATION};

/// A pooled database connection.
///
/// Dereferences to [`AsyncPgConnection`], so all repository traits
/// implemented for the connection type are directly available.
pub type PgConn = Object<AsyncPgConnection>;

/// Pooled PostgreSQL client.
///
/// Cheaply cloneable; clones share the same underlying pool.
#[derive(Clone)]
pub struct PgClient {
    pool: Pool<AsyncPgConnection>,
    config: PgConfig,
}

impl std::fmt::Debug for PgClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgClient")
            .field("max_connections", &self.config.max_connections)
            .finish_non_exhaustive()
    }
}

impl PgClient {
    /// Creates a new client with a connection pool for the given configuration.
    pub fn new(config: PgConfig) -> PgResult<Self> {
        if config.database_url.is_empty() {
            return Err(PgError::Config("database URL must not be empty".into()));
        }

        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder(manager)
            .max_size(config.effective_max_connections())
            .wait_timeout(Some(config.connect_timeout()))
            .create_timeout(Some(config.connect_timeout()))
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(|e| PgError::Config(format!("failed to build connection pool: {e}")))?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            max_connections = config.effective_max_connections(),
            "Created PostgreSQL connection pool"
        );

        Ok(Self { pool, config })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &PgConfig {
        &self.config
    }

    /// Acquires a connection from the pool.
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        self.pool.get().await.map_err(PgError::from)
    }

    /// Runs all pending embedded migrations.
    ///
    /// Migrations run on a dedicated blocking connection because the diesel
    /// migration harness is synchronous.
    pub async fn run_pending_migrations(&self) -> PgResult<()> {
        let database_url = self.config.database_url.clone();

        let applied = tokio::task::spawn_blocking(move || -> PgResult<usize> {
            let mut conn: AsyncConnectionWrapper<AsyncPgConnection> =
                AsyncConnectionWrapper::establish(&database_url)
                    .map_err(PgError::Connection)?;

            let versions = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(PgError::Migration)?;

            Ok(versions.len())
        })
        .await
        .map_err(|e| PgError::Unexpected(format!("migration task panicked: {e}").into()))??;

        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            applied,
            "Applied pending database migrations"
        );

        Ok(())
    }

    /// Verifies database connectivity by acquiring and exercising a connection.
    pub async fn ping(&self) -> PgResult<()> {
        use diesel_async::RunQueryDsl;

        let mut conn = self.get_connection().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_is_rejected() {
        let config = PgConfig::new("");
        let result = PgClient::new(config);
        assert!(matches!(result, Err(PgError::Config(_))));
    }
}
