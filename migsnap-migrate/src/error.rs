//! Error types for introspection, rendering and writing.

use std::path::PathBuf;

use migsnap_schema::SchemaError;
use thiserror::Error;

/// Result type alias for migration operations.
pub type MigrateResult<T> = Result<T, MigrationError>;

/// Errors that can occur while turning a catalog into migration artifacts.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog does not exist or cannot be reached.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Database operation error.
    #[error("Database error: {0}")]
    Database(String),

    /// Catalog rows violate an invariant of the schema model.
    #[error("Malformed metadata for table '{table}'{}: {reason}", constraint_suffix(.constraint))]
    MalformedMetadata {
        /// Owning table.
        table: String,
        /// Offending constraint, if any.
        constraint: Option<String>,
        /// What was wrong.
        reason: String,
    },

    /// Schema model error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The output directory could not be prepared.
    #[error("Cannot prepare output directory '{}': {source}", .path.display())]
    OutputDirectory {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be written.
    #[error("Failed to write artifact '{artifact}'{} to '{}': {source}", table_suffix(.table), .path.display())]
    Filesystem {
        /// Artifact name.
        artifact: String,
        /// Table the artifact creates, if any.
        table: Option<String>,
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

fn constraint_suffix(constraint: &Option<String>) -> String {
    constraint
        .as_ref()
        .map(|c| format!(", constraint '{c}'"))
        .unwrap_or_default()
}

fn table_suffix(table: &Option<String>) -> String {
    table
        .as_ref()
        .map(|t| format!(" (table '{t}')"))
        .unwrap_or_default()
}

impl MigrationError {
    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a catalog unavailable error.
    pub fn catalog_unavailable(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }

    /// Create a malformed metadata error for a constraint.
    pub fn malformed(
        table: impl Into<String>,
        constraint: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedMetadata {
            table: table.into(),
            constraint: Some(constraint.into()),
            reason: reason.into(),
        }
    }

    /// Check if the error happened before any artifact was rendered.
    pub fn is_introspection(&self) -> bool {
        matches!(
            self,
            Self::CatalogUnavailable(_)
                | Self::Database(_)
                | Self::MalformedMetadata { .. }
                | Self::Schema(_)
        )
    }
}
