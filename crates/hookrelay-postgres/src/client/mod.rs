//! PostgreSQL client, pooling and migration management.

mod pg_client;
mod pg_config;

pub use pg_client::{PgClient, PgConn};
pub use pg_config::PgConfig;
