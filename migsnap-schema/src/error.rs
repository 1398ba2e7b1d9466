//! Error types for building the catalog model.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for model construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Invariant violations detected while assembling the model.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SchemaError {
    /// An identifier was empty.
    #[error("empty {kind} name")]
    #[diagnostic(code(migsnap::schema::empty_name))]
    EmptyName { kind: &'static str },

    /// A table already has a column with this name.
    #[error("duplicate column `{table}.{column}`")]
    #[diagnostic(code(migsnap::schema::duplicate_column))]
    DuplicateColumn { table: String, column: String },

    /// A table already has a constraint with this name.
    #[error("duplicate foreign key `{constraint}` on table `{table}`")]
    #[diagnostic(code(migsnap::schema::duplicate_foreign_key))]
    DuplicateForeignKey { table: String, constraint: String },

    /// The schema already has a table with this name.
    #[error("duplicate table `{0}`")]
    #[diagnostic(code(migsnap::schema::duplicate_table))]
    DuplicateTable(String),

    /// A foreign key has no columns, or its local and referenced column lists differ in length.
    #[error(
        "foreign key `{constraint}` has {columns} local column(s) but {referenced} referenced column(s)"
    )]
    #[diagnostic(code(migsnap::schema::cardinality_mismatch))]
    CardinalityMismatch {
        constraint: String,
        columns: usize,
        referenced: usize,
    },

    /// A foreign key was attached to a table other than its owner.
    #[error("foreign key `{constraint}` belongs to `{owner}`, not `{table}`")]
    #[diagnostic(code(migsnap::schema::foreign_owner))]
    ForeignOwner {
        constraint: String,
        owner: String,
        table: String,
    },
}

impl SchemaError {
    /// Create an empty-name error.
    pub fn empty_name(kind: &'static str) -> Self {
        Self::EmptyName { kind }
    }

    /// Create a duplicate column error.
    pub fn duplicate_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a duplicate foreign key error.
    pub fn duplicate_foreign_key(table: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::DuplicateForeignKey {
            table: table.into(),
            constraint: constraint.into(),
        }
    }
}
