//! CLI configuration handling.

use std::path::{Path, PathBuf};

use migsnap_migrate::FkMode;
use serde::{Deserialize, Serialize};

use crate::error::CliResult;

/// Config file name (lives in the working directory)
pub const CONFIG_FILE_NAME: &str = "migsnap.toml";

/// Default migrations output directory
pub const DEFAULT_OUTPUT_DIR: &str = "database/migrations/imported";

/// Default temporary database for imports
pub const DEFAULT_TEMP_DATABASE: &str = "legacy_tmp";

/// Framework bookkeeping tables that are never turned into migrations.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "migrations",
    "cache",
    "cache_locks",
    "jobs",
    "job_batches",
    "failed_jobs",
];

/// migsnap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Generator configuration
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Tables to skip: the built-in list, the configured list, then `extra`.
    ///
    /// Blank entries are dropped and duplicates kept once.
    pub fn excluded_tables(&self, extra: &[String]) -> Vec<String> {
        let mut tables: Vec<String> = Vec::new();
        let candidates = DEFAULT_EXCLUDES
            .iter()
            .map(|t| t.to_string())
            .chain(self.generator.except.iter().cloned())
            .chain(extra.iter().cloned());

        for table in candidates {
            let table = table.trim().to_string();
            if !table.is_empty() && !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }
}

/// Load `migsnap.toml` from `dir`, or defaults when it is absent.
pub fn load_config(dir: &Path) -> CliResult<Config> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        tracing::debug!(path = %path.display(), "Loading config");
        Config::load(&path)
    } else {
        Ok(Config::default())
    }
}

/// Database configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: Option<String>,

    /// mysql client binary used for imports
    pub mysql_bin: Option<PathBuf>,
}

/// Generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Output directory for migrations
    pub output: PathBuf,

    /// Foreign key emission mode
    pub fk_mode: FkMode,

    /// Additional tables to skip
    pub except: Vec<String>,

    /// Temporary database used by `import`
    pub temp_database: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fk_mode: FkMode::Separate,
            except: Vec::new(),
            temp_database: DEFAULT_TEMP_DATABASE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.generator.output, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.generator.fk_mode, FkMode::Separate);
        assert_eq!(config.generator.temp_database, "legacy_tmp");
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [database]
            url = "mysql://root@localhost"

            [generator]
            fk_mode = "inline"
            except = ["sessions"]
            "#,
        )
        .unwrap();

        assert_eq!(config.database.url.as_deref(), Some("mysql://root@localhost"));
        assert_eq!(config.generator.fk_mode, FkMode::Inline);
        assert_eq!(config.generator.output, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.generator.temp_database, DEFAULT_TEMP_DATABASE);
    }

    #[test]
    fn test_reject_unknown_fk_mode() {
        let result: Result<Config, _> = toml::from_str("[generator]\nfk_mode = \"both\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_excluded_tables_merge() {
        let mut config = Config::default();
        config.generator.except = vec!["sessions".into(), "jobs".into()];

        let tables = config.excluded_tables(&["telescope_entries".into(), " ".into()]);
        assert_eq!(
            tables,
            [
                "migrations",
                "cache",
                "cache_locks",
                "jobs",
                "job_batches",
                "failed_jobs",
                "sessions",
                "telescope_entries",
            ]
        );
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.generator.except.is_empty());
    }

    #[test]
    fn test_load_config_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[generator]\noutput = \"out\"\ntemp_database = \"scratch\"\n",
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.generator.output, PathBuf::from("out"));
        assert_eq!(config.generator.temp_database, "scratch");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[generator\n").unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, crate::error::CliError::Config(_)));
    }
}
