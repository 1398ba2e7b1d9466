//! Temporary database administration.

use tracing::info;

use crate::error::{MysqlError, MysqlResult};
use crate::pool::MysqlPool;

/// Quote an identifier with backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Statement dropping a database if it exists.
pub fn drop_statement(name: &str) -> String {
    format!("DROP DATABASE IF EXISTS {}", quote_identifier(name))
}

/// Statement creating a utf8mb4 database.
pub fn create_statement(name: &str) -> String {
    format!(
        "CREATE DATABASE {} CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci",
        quote_identifier(name)
    )
}

/// A scratch database that a dump is imported into.
///
/// Created empty, replacing any database of the same name. Dropping it is
/// explicit: by default it is kept for inspection.
#[derive(Debug, Clone)]
pub struct TempDatabase {
    pool: MysqlPool,
    name: String,
}

impl TempDatabase {
    /// Drop and recreate `name` using a server-level pool.
    pub async fn create(pool: MysqlPool, name: impl Into<String>) -> MysqlResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MysqlError::config("temporary database name is empty"));
        }

        let mut conn = pool.get().await?;
        conn.execute(&drop_statement(&name)).await?;
        conn.execute(&create_statement(&name)).await?;
        info!(database = %name, "Created temporary database");

        Ok(Self { pool, name })
    }

    /// Database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drop the database.
    pub async fn remove(self) -> MysqlResult<()> {
        let mut conn = self.pool.get().await?;
        conn.execute(&drop_statement(&self.name)).await?;
        info!(database = %self.name, "Dropped temporary database");
        Ok(())
    }
}
