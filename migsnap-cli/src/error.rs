//! CLI error types and result alias.

use migsnap_migrate::MigrationError;
use migsnap_mysql::MysqlError;
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types, one per failing stage
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(migsnap::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(migsnap::config))]
    Config(String),

    /// Database administration error
    #[error("Database error: {0}")]
    #[diagnostic(code(migsnap::database))]
    Database(String),

    /// Dump import error
    #[error("Import error: {0}")]
    #[diagnostic(code(migsnap::import))]
    Import(String),

    /// Catalog introspection error
    #[error("Introspection error: {0}")]
    #[diagnostic(code(migsnap::introspection))]
    Introspection(String),

    /// Migration rendering or writing error
    #[error("Generation error: {0}")]
    #[diagnostic(code(migsnap::generation))]
    Generation(String),
}

impl CliError {
    /// Classify a failure raised while reading the catalog.
    pub fn introspection(err: MigrationError) -> Self {
        Self::Introspection(err.to_string())
    }

    /// Classify any failure raised while loading a dump.
    pub fn import(err: MysqlError) -> Self {
        Self::Import(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Generation(format!("Failed to serialize schema: {}", err))
    }
}

impl From<MigrationError> for CliError {
    fn from(err: MigrationError) -> Self {
        if err.is_introspection() {
            CliError::Introspection(err.to_string())
        } else {
            CliError::Generation(err.to_string())
        }
    }
}

impl From<MysqlError> for CliError {
    fn from(err: MysqlError) -> Self {
        match err {
            MysqlError::Config(msg) => CliError::Config(msg),
            err @ MysqlError::Import { .. } => CliError::Import(err.to_string()),
            err => CliError::Database(err.to_string()),
        }
    }
}
