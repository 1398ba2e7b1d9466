//! `information_schema` catalog.

use migsnap_migrate::introspect::mysql_queries;
use migsnap_migrate::{Catalog, ColumnRow, ForeignKeyRow, MigrateResult};

use crate::error::MysqlResult;
use crate::pool::MysqlPool;

type RawColumn = (
    String,
    String,
    Option<u64>,
    Option<u64>,
    Option<u64>,
    String,
    Option<String>,
    Option<String>,
    String,
);

type RawForeignKey = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    u32,
    Option<String>,
    Option<String>,
);

/// Reads one schema through `information_schema`.
#[derive(Debug, Clone)]
pub struct MysqlCatalog {
    pool: MysqlPool,
    database: String,
}

impl MysqlCatalog {
    /// Create a catalog for the database named in the pool configuration.
    pub fn new(pool: MysqlPool) -> MysqlResult<Self> {
        let database = pool.config().require_database()?.to_string();
        Ok(Self { pool, database })
    }

    /// Create a catalog for an explicit database.
    pub fn for_database(pool: MysqlPool, database: impl Into<String>) -> Self {
        Self {
            pool,
            database: database.into(),
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &MysqlPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Catalog for MysqlCatalog {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn database_exists(&self) -> MigrateResult<bool> {
        let mut conn = self.pool.get().await?;
        let found: Option<String> = conn
            .query_optional_params(mysql_queries::DATABASE_EXISTS, (self.database.as_str(),))
            .await?;
        Ok(found.is_some())
    }

    async fn list_tables(&self) -> MigrateResult<Vec<String>> {
        let mut conn = self.pool.get().await?;
        let tables = conn
            .query_params(mysql_queries::TABLES, (self.database.as_str(),))
            .await?;
        Ok(tables)
    }

    async fn list_columns(&self, table: &str) -> MigrateResult<Vec<ColumnRow>> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<RawColumn> = conn
            .query_params(mysql_queries::COLUMNS, (self.database.as_str(), table))
            .await?;
        Ok(rows.into_iter().map(column_row).collect())
    }

    async fn list_foreign_keys(&self, table: &str) -> MigrateResult<Vec<ForeignKeyRow>> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<RawForeignKey> = conn
            .query_params(mysql_queries::FOREIGN_KEYS, (self.database.as_str(), table))
            .await?;
        Ok(rows.into_iter().map(foreign_key_row).collect())
    }
}

fn column_row(raw: RawColumn) -> ColumnRow {
    let (name, data_type, length, precision, scale, nullable, default, extra, column_type) = raw;
    ColumnRow {
        column_name: name,
        data_type: data_type.to_ascii_lowercase(),
        character_maximum_length: length,
        numeric_precision: precision,
        numeric_scale: scale,
        is_nullable: nullable,
        column_default: default,
        extra: extra.unwrap_or_default(),
        column_type,
    }
}

fn foreign_key_row(raw: RawForeignKey) -> ForeignKeyRow {
    let (constraint, table, column, ref_table, ref_column, position, update, delete) = raw;
    ForeignKeyRow {
        constraint_name: constraint,
        table_name: table,
        column_name: column,
        referenced_table_name: ref_table,
        referenced_column_name: ref_column,
        ordinal_position: position,
        update_rule: update,
        delete_rule: delete,
    }
}
