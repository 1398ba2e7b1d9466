//! Error types for MySQL operations.

use migsnap_migrate::MigrationError;
use thiserror::Error;

/// Result type for MySQL operations.
pub type MysqlResult<T> = Result<T, MysqlError>;

/// Error type for MySQL operations.
#[derive(Debug, Error)]
pub enum MysqlError {
    /// MySQL driver error.
    #[error("MySQL error: {0}")]
    Mysql(#[from] mysql_async::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error.
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// The `mysql` client failed to import a dump.
    #[error("SQL import failed: {message}{}", stderr_suffix(.stderr))]
    Import {
        /// What went wrong.
        message: String,
        /// Captured standard error of the client.
        stderr: String,
    },

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

impl MysqlError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an import error.
    pub fn import(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Import {
            message: message.into(),
            stderr: stderr.into(),
        }
    }

    /// Check if the server could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Mysql(e) => matches!(e, mysql_async::Error::Io(_)),
            _ => false,
        }
    }
}

impl From<MysqlError> for MigrationError {
    fn from(err: MysqlError) -> Self {
        if err.is_unreachable() {
            return MigrationError::catalog_unavailable(err.to_string());
        }
        match err {
            MysqlError::Io(e) => MigrationError::Io(e),
            other => MigrationError::database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MysqlError::config("invalid url");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("invalid url"));
    }

    #[test]
    fn test_import_error_includes_stderr() {
        let err = MysqlError::import("mysql exited with status 1", "ERROR 1064 (42000)\n");
        assert_eq!(
            err.to_string(),
            "SQL import failed: mysql exited with status 1\nERROR 1064 (42000)"
        );
        let err = MysqlError::import("mysql exited with status 1", "  ");
        assert_eq!(err.to_string(), "SQL import failed: mysql exited with status 1");
    }

    #[test]
    fn test_conversion_to_migration_error() {
        let err: MigrationError = MysqlError::timeout("connect after 30s").into();
        assert!(matches!(err, MigrationError::CatalogUnavailable(_)));

        let err: MigrationError = MysqlError::config("no username").into();
        assert!(matches!(err, MigrationError::Database(_)));
    }
}
