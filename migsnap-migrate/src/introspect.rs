//! Catalog introspection.
//!
//! [`SchemaReader`] walks a [`Catalog`] one table at a time and assembles a
//! [`Schema`]. Catalog rows are kept raw ([`ColumnRow`], [`ForeignKeyRow`]) so
//! that every normalisation step lives here and can be tested without a server.

use std::collections::{BTreeMap, HashMap};

use migsnap_schema::{Column, ColumnDefault, ForeignKey, ReferentialAction, Schema, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MigrateResult, MigrationError};

/// Result of introspecting a catalog.
#[derive(Debug, Clone)]
pub struct IntrospectionResult {
    /// The assembled schema, tables in lexical order.
    pub schema: Schema,
    /// Human-readable warnings collected while reading.
    pub warnings: Vec<String>,
    /// Foreign key groups that were dropped as malformed.
    pub skipped_constraints: Vec<SkippedConstraint>,
}

/// A foreign key constraint that was skipped during introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConstraint {
    /// Owning table.
    pub table: String,
    /// Constraint name.
    pub constraint: String,
    /// Reason it was skipped.
    pub reason: String,
}

impl SkippedConstraint {
    fn into_error(self) -> MigrationError {
        MigrationError::malformed(self.table, self.constraint, self.reason)
    }
}

/// Raw column metadata, one row of the catalog's column listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRow {
    /// Column name.
    pub column_name: String,
    /// Lowercase type name (`DATA_TYPE`).
    pub data_type: String,
    /// Maximum character length.
    pub character_maximum_length: Option<u64>,
    /// Numeric precision.
    pub numeric_precision: Option<u64>,
    /// Numeric scale.
    pub numeric_scale: Option<u64>,
    /// `YES` or `NO`.
    pub is_nullable: String,
    /// Raw default expression.
    pub column_default: Option<String>,
    /// Engine extra flags, e.g. `auto_increment`.
    pub extra: String,
    /// Complete type string (`COLUMN_TYPE`).
    pub column_type: String,
}

impl ColumnRow {
    /// Create a non-null row with the given type.
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Self {
        Self {
            column_name: name.into(),
            data_type: data_type.into(),
            column_type: column_type.into(),
            is_nullable: "NO".to_string(),
            ..Default::default()
        }
    }

    /// Set the character length.
    pub fn length(mut self, length: u64) -> Self {
        self.character_maximum_length = Some(length);
        self
    }

    /// Set the numeric precision and scale.
    pub fn numeric(mut self, precision: u64, scale: u64) -> Self {
        self.numeric_precision = Some(precision);
        self.numeric_scale = Some(scale);
        self
    }

    /// Mark the row nullable.
    pub fn nullable(mut self) -> Self {
        self.is_nullable = "YES".to_string();
        self
    }

    /// Set the raw default expression.
    pub fn default_expr(mut self, default: impl Into<String>) -> Self {
        self.column_default = Some(default.into());
        self
    }

    /// Set the extra flags.
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}

/// Raw foreign key metadata: one key-column-usage row joined with its
/// referential constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    /// Constraint name.
    pub constraint_name: String,
    /// Owning table.
    pub table_name: String,
    /// Local column.
    pub column_name: String,
    /// Referenced table; `None` for key usage that is not a foreign key.
    pub referenced_table_name: Option<String>,
    /// Referenced column.
    pub referenced_column_name: Option<String>,
    /// Position within the constraint, 1-based.
    pub ordinal_position: u32,
    /// `UPDATE_RULE`.
    pub update_rule: Option<String>,
    /// `DELETE_RULE`.
    pub delete_rule: Option<String>,
}

impl ForeignKeyRow {
    /// Create a row referencing `referenced_table.referenced_column`.
    pub fn new(
        constraint: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            constraint_name: constraint.into(),
            table_name: table.into(),
            column_name: column.into(),
            referenced_table_name: Some(referenced_table.into()),
            referenced_column_name: Some(referenced_column.into()),
            ordinal_position: 1,
            update_rule: None,
            delete_rule: None,
        }
    }

    /// Set the position within the constraint.
    pub fn position(mut self, position: u32) -> Self {
        self.ordinal_position = position;
        self
    }

    /// Set the update and delete rules.
    pub fn rules(mut self, update: impl Into<String>, delete: impl Into<String>) -> Self {
        self.update_rule = Some(update.into());
        self.delete_rule = Some(delete.into());
        self
    }
}

/// A handle on one populated catalog.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Name of the database being read.
    fn database_name(&self) -> &str;

    /// Check whether the database exists.
    async fn database_exists(&self) -> MigrateResult<bool>;

    /// List base table names.
    async fn list_tables(&self) -> MigrateResult<Vec<String>>;

    /// List columns of a table in ordinal order.
    async fn list_columns(&self, table: &str) -> MigrateResult<Vec<ColumnRow>>;

    /// List foreign key rows of a table.
    async fn list_foreign_keys(&self, table: &str) -> MigrateResult<Vec<ForeignKeyRow>>;
}

/// A catalog held in memory.
///
/// Useful for offline snapshots and for exercising the reader without a server.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    database: String,
    tables: Vec<String>,
    columns: HashMap<String, Vec<ColumnRow>>,
    foreign_keys: HashMap<String, Vec<ForeignKeyRow>>,
}

impl MemoryCatalog {
    /// Create an empty catalog for `database`.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Default::default()
        }
    }

    /// Add a table with its columns.
    pub fn with_table(mut self, table: &str, columns: Vec<ColumnRow>) -> Self {
        self.tables.push(table.to_string());
        self.columns.insert(table.to_string(), columns);
        self
    }

    /// Add foreign key rows for a table.
    pub fn with_foreign_keys(mut self, table: &str, rows: Vec<ForeignKeyRow>) -> Self {
        self.foreign_keys
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        self
    }
}

#[async_trait::async_trait]
impl Catalog for MemoryCatalog {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn database_exists(&self) -> MigrateResult<bool> {
        Ok(!self.database.is_empty())
    }

    async fn list_tables(&self) -> MigrateResult<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn list_columns(&self, table: &str) -> MigrateResult<Vec<ColumnRow>> {
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn list_foreign_keys(&self, table: &str) -> MigrateResult<Vec<ForeignKeyRow>> {
        Ok(self.foreign_keys.get(table).cloned().unwrap_or_default())
    }
}

/// Builds a [`Schema`] from a [`Catalog`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaReader;

impl SchemaReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every table of the catalog.
    ///
    /// Tables are visited in lexical order, one at a time. Malformed foreign
    /// key groups are skipped and reported in the result instead of failing.
    pub async fn read<C>(&self, catalog: &C) -> MigrateResult<IntrospectionResult>
    where
        C: Catalog + ?Sized,
    {
        let database = catalog.database_name();
        if !catalog.database_exists().await? {
            return Err(MigrationError::catalog_unavailable(format!(
                "database '{database}' does not exist"
            )));
        }

        let mut names = catalog.list_tables().await?;
        names.sort();
        names.dedup();
        debug!(database, tables = names.len(), "Reading catalog");

        let mut warnings = Vec::new();
        let mut skipped_constraints = Vec::new();
        let mut tables = Vec::with_capacity(names.len());

        for name in names {
            let mut table = Table::new(name.as_str());

            for row in catalog.list_columns(&name).await? {
                match build_column(row) {
                    Some(column) => {
                        if let Err(e) = table.add_column(column) {
                            debug!(table = %name, error = %e, "Skipping column");
                            warnings.push(format!("Skipped column in '{name}': {e}"));
                        }
                    }
                    None => {
                        debug!(table = %name, "Skipping column without a name");
                        warnings.push(format!("Skipped unnamed column in '{name}'"));
                    }
                }
            }

            let rows = catalog.list_foreign_keys(&name).await?;
            let (foreign_keys, skipped) = group_foreign_keys(&name, rows);
            for fk in foreign_keys {
                table.add_foreign_key(fk)?;
            }
            for skip in skipped {
                let err = skip.clone().into_error();
                debug!(table = %skip.table, constraint = %skip.constraint, "{err}");
                warnings.push(err.to_string());
                skipped_constraints.push(skip);
            }

            debug!(
                table = %name,
                columns = table.columns.len(),
                foreign_keys = table.foreign_keys.len(),
                "Read table"
            );
            tables.push(table);
        }

        Ok(IntrospectionResult {
            schema: Schema::from_tables(tables)?,
            warnings,
            skipped_constraints,
        })
    }
}

/// Normalise one column row. Returns `None` for a row without a name.
pub fn build_column(row: ColumnRow) -> Option<Column> {
    if row.column_name.trim().is_empty() {
        return None;
    }

    let mut column = Column::new(row.column_name, &row.data_type)
        .nullable(row.is_nullable.eq_ignore_ascii_case("YES"))
        .unsigned(row.column_type.to_ascii_lowercase().contains("unsigned"))
        .auto_increment(row.extra.to_ascii_lowercase().contains("auto_increment"));

    if !row.column_type.is_empty() {
        column = column.full_type(row.column_type);
    }

    let native = column.native();
    if native.supports_length() {
        column.length = row.character_maximum_length;
    }
    if native.supports_precision() {
        column.precision = row.numeric_precision;
        column.scale = row.numeric_scale;
    }

    column.default = parse_default(row.column_default.as_deref());
    Some(column)
}

/// Interpret a raw default expression.
///
/// The current-timestamp function is recognised in any case, with or without a
/// parenthesised precision. An unquoted `NULL` (how MariaDB reports a nullable
/// column without a default) means no default at all. Any other value loses
/// one pair of surrounding single quotes, and inside a quoted value each
/// doubled quote collapses to one.
pub fn parse_default(raw: Option<&str>) -> Option<ColumnDefault> {
    let raw = raw?;
    if is_current_timestamp(raw) {
        return Some(ColumnDefault::CurrentTimestamp);
    }
    if raw.trim().eq_ignore_ascii_case("NULL") {
        return None;
    }
    match raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(quoted) => Some(ColumnDefault::literal(quoted.replace("''", "'"))),
        None => Some(ColumnDefault::literal(raw)),
    }
}

fn is_current_timestamp(raw: &str) -> bool {
    let upper = raw.trim().to_ascii_uppercase();
    let Some(rest) = upper.strip_prefix("CURRENT_TIMESTAMP") else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    rest.strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_digit()))
}

/// Group foreign key rows into constraints.
///
/// Rows without a referenced table are ignored. Each remaining group is
/// ordered by position and validated; invalid groups are returned as skipped.
/// Constraints come back ordered by name.
pub fn group_foreign_keys(
    table: &str,
    rows: Vec<ForeignKeyRow>,
) -> (Vec<ForeignKey>, Vec<SkippedConstraint>) {
    let mut groups: BTreeMap<String, Vec<ForeignKeyRow>> = BTreeMap::new();
    for row in rows {
        if row.referenced_table_name.is_none() {
            continue;
        }
        groups
            .entry(row.constraint_name.clone())
            .or_default()
            .push(row);
    }

    let mut keys = Vec::new();
    let mut skipped = Vec::new();

    for (constraint, mut group) in groups {
        group.sort_by_key(|r| r.ordinal_position);
        match build_foreign_key(table, &constraint, &group) {
            Ok(fk) => keys.push(fk),
            Err(reason) => skipped.push(SkippedConstraint {
                table: table.to_string(),
                constraint,
                reason,
            }),
        }
    }

    (keys, skipped)
}

fn build_foreign_key(
    table: &str,
    constraint: &str,
    group: &[ForeignKeyRow],
) -> Result<ForeignKey, String> {
    let first = group
        .first()
        .ok_or_else(|| "constraint has no rows".to_string())?;

    if group.iter().any(|r| r.table_name != table) {
        return Err(format!("rows belong to a table other than '{table}'"));
    }
    if let Some(w) = group
        .windows(2)
        .find(|w| w[0].ordinal_position == w[1].ordinal_position)
    {
        return Err(format!("duplicate position {}", w[0].ordinal_position));
    }

    let referenced_table = first.referenced_table_name.as_deref().unwrap_or_default();
    if group
        .iter()
        .any(|r| r.referenced_table_name.as_deref() != Some(referenced_table))
    {
        return Err("rows disagree on the referenced table".to_string());
    }

    let mut columns = Vec::with_capacity(group.len());
    let mut referenced = Vec::with_capacity(group.len());
    for row in group {
        let Some(target) = row.referenced_column_name.as_deref().filter(|c| !c.is_empty()) else {
            return Err(format!(
                "column '{}' has no referenced column",
                row.column_name
            ));
        };
        columns.push(row.column_name.as_str());
        referenced.push(target);
    }

    let mut fk = ForeignKey::new(constraint, table, columns, referenced_table, referenced)
        .map_err(|e| e.to_string())?;
    if let Some(rule) = first.update_rule.as_deref().filter(|r| !r.trim().is_empty()) {
        fk = fk.on_update(ReferentialAction::parse(rule));
    }
    if let Some(rule) = first.delete_rule.as_deref().filter(|r| !r.trim().is_empty()) {
        fk = fk.on_delete(ReferentialAction::parse(rule));
    }
    Ok(fk)
}

/// SQL queries for MySQL introspection.
///
/// Every query binds the schema name first and, where present, the table name second.
pub mod mysql_queries {
    /// Query to check that a schema exists.
    pub const DATABASE_EXISTS: &str = r#"
        SELECT SCHEMA_NAME
        FROM information_schema.SCHEMATA
        WHERE SCHEMA_NAME = ?
    "#;

    /// Query to get all base tables.
    pub const TABLES: &str = r#"
        SELECT TABLE_NAME
        FROM information_schema.TABLES
        WHERE TABLE_SCHEMA = ?
          AND TABLE_TYPE = 'BASE TABLE'
        ORDER BY TABLE_NAME
    "#;

    /// Query to get columns for a table.
    pub const COLUMNS: &str = r#"
        SELECT
            COLUMN_NAME,
            DATA_TYPE,
            CHARACTER_MAXIMUM_LENGTH,
            NUMERIC_PRECISION,
            NUMERIC_SCALE,
            IS_NULLABLE,
            COLUMN_DEFAULT,
            EXTRA,
            COLUMN_TYPE
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = ?
          AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
    "#;

    /// Query to get foreign key column usage joined with referential rules.
    pub const FOREIGN_KEYS: &str = r#"
        SELECT
            kcu.CONSTRAINT_NAME,
            kcu.TABLE_NAME,
            kcu.COLUMN_NAME,
            kcu.REFERENCED_TABLE_NAME,
            kcu.REFERENCED_COLUMN_NAME,
            kcu.ORDINAL_POSITION,
            rc.UPDATE_RULE,
            rc.DELETE_RULE
        FROM information_schema.KEY_COLUMN_USAGE kcu
        JOIN information_schema.REFERENTIAL_CONSTRAINTS rc
          ON rc.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA
         AND rc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
        WHERE kcu.TABLE_SCHEMA = ?
          AND kcu.TABLE_NAME = ?
          AND kcu.REFERENCED_TABLE_NAME IS NOT NULL
        ORDER BY kcu.CONSTRAINT_NAME, kcu.ORDINAL_POSITION
    "#;
}
