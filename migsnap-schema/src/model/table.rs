//! Table definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Column, ForeignKey};
use crate::error::{SchemaError, SchemaResult};

/// One relation with its columns in ordinal order and its foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: SmolStr,
    /// Columns keyed by name, in catalog ordinal order.
    pub columns: IndexMap<SmolStr, Column>,
    /// Foreign keys keyed by constraint name.
    pub foreign_keys: IndexMap<SmolStr, ForeignKey>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
            foreign_keys: IndexMap::new(),
        }
    }

    /// Get the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a column.
    pub fn add_column(&mut self, column: Column) -> SchemaResult<()> {
        if column.name.is_empty() {
            return Err(SchemaError::empty_name("column"));
        }
        if self.columns.contains_key(&column.name) {
            return Err(SchemaError::duplicate_column(
                self.name.as_str(),
                column.name.as_str(),
            ));
        }
        self.columns.insert(column.name.clone(), column);
        Ok(())
    }

    /// Attach a foreign key owned by this table.
    pub fn add_foreign_key(&mut self, fk: ForeignKey) -> SchemaResult<()> {
        if fk.table_name != self.name {
            return Err(SchemaError::ForeignOwner {
                constraint: fk.constraint_name.to_string(),
                owner: fk.table_name.to_string(),
                table: self.name.to_string(),
            });
        }
        if self.foreign_keys.contains_key(&fk.constraint_name) {
            return Err(SchemaError::duplicate_foreign_key(
                self.name.as_str(),
                fk.constraint_name.as_str(),
            ));
        }
        self.foreign_keys.insert(fk.constraint_name.clone(), fk);
        Ok(())
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Iterate columns in ordinal order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Iterate foreign keys.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys.values()
    }

    /// Check if the table owns any foreign key.
    pub fn has_foreign_keys(&self) -> bool {
        !self.foreign_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_keep_insertion_order() {
        let mut table = Table::new("users");
        table.add_column(Column::new("id", "bigint")).unwrap();
        table.add_column(Column::new("name", "varchar")).unwrap();
        table.add_column(Column::new("created_at", "timestamp")).unwrap();

        let names: Vec<_> = table.columns().map(|c| c.name()).collect();
        assert_eq!(names, ["id", "name", "created_at"]);
        assert!(!table.has_foreign_keys());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = Table::new("users");
        table.add_column(Column::new("id", "bigint")).unwrap();
        let err = table.add_column(Column::new("id", "int")).unwrap_err();
        assert_eq!(err, SchemaError::duplicate_column("users", "id"));
    }

    #[test]
    fn test_empty_column_name_rejected() {
        let mut table = Table::new("users");
        assert!(table.add_column(Column::new("", "int")).is_err());
    }

    #[test]
    fn test_foreign_key_owner_checked() {
        let mut table = Table::new("posts");
        let fk = ForeignKey::new("fk", "comments", ["post_id"], "posts", ["id"]).unwrap();
        assert!(matches!(
            table.add_foreign_key(fk),
            Err(SchemaError::ForeignOwner { .. })
        ));

        let fk = ForeignKey::new("fk", "posts", ["user_id"], "users", ["id"]).unwrap();
        table.add_foreign_key(fk.clone()).unwrap();
        assert!(table.has_foreign_keys());
        assert!(matches!(
            table.add_foreign_key(fk),
            Err(SchemaError::DuplicateForeignKey { .. })
        ));
    }
}
