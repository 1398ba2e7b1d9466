//! Top-level schema snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::Table;
use crate::error::{SchemaError, SchemaResult};

/// All tables of one catalog, ordered lexically by name.
///
/// The ordering is maintained on every insertion and survives exclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Tables keyed by name.
    pub tables: IndexMap<SmolStr, Table>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from tables in any order.
    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> SchemaResult<Self> {
        let mut schema = Self::new();
        for table in tables {
            schema.insert(table)?;
        }
        schema.tables.sort_keys();
        Ok(schema)
    }

    /// Add a table, keeping lexical order.
    pub fn add_table(&mut self, table: Table) -> SchemaResult<()> {
        self.insert(table)?;
        self.tables.sort_keys();
        Ok(())
    }

    fn insert(&mut self, table: Table) -> SchemaResult<()> {
        if table.name.is_empty() {
            return Err(SchemaError::empty_name("table"));
        }
        if self.tables.contains_key(&table.name) {
            return Err(SchemaError::DuplicateTable(table.name.to_string()));
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Remove whole tables by name, returning the names actually removed.
    pub fn exclude<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Vec<SmolStr> {
        let mut removed = Vec::new();
        for name in names {
            if let Some((key, _)) = self.tables.shift_remove_entry(name) {
                removed.push(key);
            }
        }
        removed
    }

    /// Get a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Iterate tables in lexical order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Iterate table names in lexical order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the schema has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of foreign keys across all tables.
    pub fn foreign_key_count(&self) -> usize {
        self.tables().map(|t| t.foreign_keys.len()).sum()
    }

    /// Collect counts for reporting.
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            table_count: self.tables.len(),
            column_count: self.tables().map(|t| t.columns.len()).sum(),
            foreign_key_count: self.foreign_key_count(),
        }
    }
}

/// Schema statistics for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaStats {
    /// Number of tables.
    pub table_count: usize,
    /// Number of columns across all tables.
    pub column_count: usize,
    /// Number of foreign keys across all tables.
    pub foreign_key_count: usize,
}
