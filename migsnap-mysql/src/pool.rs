//! Connection pool for MySQL.

use std::sync::Arc;

use mysql_async::{Opts, Pool, PoolConstraints, PoolOpts};
use tracing::{debug, info};

use crate::config::MysqlConfig;
use crate::connection::MysqlConnection;
use crate::error::{MysqlError, MysqlResult};

/// A small connection pool.
///
/// Introspection and administration run one statement at a time, so the pool
/// never grows past a couple of connections.
#[derive(Clone)]
pub struct MysqlPool {
    inner: Pool,
    config: Arc<MysqlConfig>,
}

impl MysqlPool {
    /// Create a pool. No connection is opened until [`MysqlPool::get`].
    pub fn new(config: MysqlConfig) -> Self {
        let constraints = PoolConstraints::new(0, 2).unwrap_or_default();
        let opts = config
            .to_opts_builder()
            .pool_opts(PoolOpts::new().with_constraints(constraints));

        info!(
            address = %config.display_address(),
            "MySQL connection pool created"
        );

        Self {
            inner: Pool::new(Opts::from(opts)),
            config: Arc::new(config),
        }
    }

    /// Get a connection, failing after the configured connect timeout.
    pub async fn get(&self) -> MysqlResult<MysqlConnection> {
        debug!("Acquiring connection from pool");
        let timeout = self.config.connect_timeout;
        let conn = tokio::time::timeout(timeout, self.inner.get_conn())
            .await
            .map_err(|_| {
                MysqlError::timeout(format!(
                    "no connection to {} after {}s",
                    self.config.display_address(),
                    timeout.as_secs()
                ))
            })??;
        Ok(MysqlConnection::new(conn))
    }

    /// Get the pool configuration.
    pub fn config(&self) -> &MysqlConfig {
        &self.config
    }

    /// Disconnect all connections and close the pool.
    pub async fn disconnect(self) -> MysqlResult<()> {
        self.inner.disconnect().await?;
        info!("MySQL connection pool closed");
        Ok(())
    }
}

impl std::fmt::Debug for MysqlPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlPool")
            .field("address", &self.config.display_address())
            .finish()
    }
}
