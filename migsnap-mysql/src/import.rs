//! Dump import through the `mysql` command-line client.
//!
//! The client reads the file itself (`source <path>`), so arbitrarily large
//! dumps never pass through this process.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::MysqlConfig;
use crate::error::{MysqlError, MysqlResult};

/// Default client binary.
pub const DEFAULT_MYSQL_BIN: &str = "mysql";

/// Default time allowed for one import.
pub const DEFAULT_IMPORT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Imports `.sql` dumps into a database.
#[derive(Debug, Clone)]
pub struct SqlImporter {
    mysql_bin: PathBuf,
    timeout: Duration,
}

impl Default for SqlImporter {
    fn default() -> Self {
        Self {
            mysql_bin: PathBuf::from(DEFAULT_MYSQL_BIN),
            timeout: DEFAULT_IMPORT_TIMEOUT,
        }
    }
}

impl SqlImporter {
    /// Create an importer using `mysql` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another client binary.
    pub fn mysql_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.mysql_bin = bin.into();
        self
    }

    /// Set the import timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Client arguments for importing `sql_path` into `database`.
    ///
    /// The password is never part of the arguments.
    pub fn command_args(
        &self,
        config: &MysqlConfig,
        database: &str,
        sql_path: &Path,
    ) -> MysqlResult<Vec<String>> {
        let user = config
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| MysqlError::config("a username is required to import"))?;

        let mut args = Vec::with_capacity(6);
        match &config.socket {
            Some(socket) => args.push(format!("--socket={socket}")),
            None => {
                args.push(format!("-h{}", config.host));
                args.push(format!("-P{}", config.port));
            }
        }
        args.push(format!("-u{user}"));
        args.push(database.to_string());
        args.push("--default-character-set=utf8mb4".to_string());
        args.push(format!("--execute=source {}", source_path(sql_path)));
        Ok(args)
    }

    /// Import `sql_path` into `database`.
    pub async fn import(
        &self,
        config: &MysqlConfig,
        database: &str,
        sql_path: &Path,
    ) -> MysqlResult<()> {
        if !tokio::fs::metadata(sql_path).await?.is_file() {
            return Err(MysqlError::config(format!(
                "SQL file not found: {}",
                sql_path.display()
            )));
        }
        let sql_path = tokio::fs::canonicalize(sql_path).await?;
        let args = self.command_args(config, database, &sql_path)?;

        let mut cmd = Command::new(&self.mysql_bin);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(password) = config.password.as_deref().filter(|p| !p.is_empty()) {
            cmd.env("MYSQL_PWD", password);
        }

        debug!(bin = %self.mysql_bin.display(), ?args, "Running mysql client");
        info!(database, file = %sql_path.display(), "Importing SQL dump");

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MysqlError::import(
                    format!(
                        "'{}' not found; install the mysql client or pass its path",
                        self.mysql_bin.display()
                    ),
                    "",
                ));
            }
            Ok(Err(e)) => {
                return Err(MysqlError::import(
                    format!("failed to run '{}': {e}", self.mysql_bin.display()),
                    "",
                ));
            }
            Err(_) => {
                return Err(MysqlError::timeout(format!(
                    "import did not finish within {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            return Err(MysqlError::import(
                format!(
                    "'{} {}' exited with {}",
                    self.mysql_bin.display(),
                    args.join(" "),
                    output.status
                ),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        info!(database, "SQL dump imported");
        Ok(())
    }
}

/// Path as the client's `source` command expects it, with forward slashes.
fn source_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MysqlConfig {
        MysqlConfig::from_url("mysql://root:secret@db:3307").unwrap()
    }

    #[test]
    fn test_command_args_tcp() {
        let args = SqlImporter::new()
            .command_args(&config(), "legacy_tmp", Path::new("/dumps/app.sql"))
            .unwrap();
        assert_eq!(
            args,
            [
                "-hdb",
                "-P3307",
                "-uroot",
                "legacy_tmp",
                "--default-character-set=utf8mb4",
                "--execute=source /dumps/app.sql",
            ]
        );
        assert!(args.iter().all(|a| !a.contains("secret")));
    }

    #[test]
    fn test_command_args_socket() {
        let config = config().socket("/run/mysqld/mysqld.sock");
        let args = SqlImporter::new()
            .command_args(&config, "legacy_tmp", Path::new("/dumps/app.sql"))
            .unwrap();
        assert_eq!(args[0], "--socket=/run/mysqld/mysqld.sock");
        assert_eq!(args[1], "-uroot");
    }

    #[test]
    fn test_command_args_require_user() {
        let config = MysqlConfig::from_url("mysql://db").unwrap();
        let err = SqlImporter::new()
            .command_args(&config, "x", Path::new("a.sql"))
            .unwrap_err();
        assert!(matches!(err, MysqlError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqlImporter::new()
            .import(&config(), "x", &dir.path().join("missing.sql"))
            .await
            .unwrap_err();
        assert!(matches!(err, MysqlError::Io(_)));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let sql = dir.path().join("dump.sql");
        tokio::fs::write(&sql, "SELECT 1;").await.unwrap();

        let err = SqlImporter::new()
            .mysql_bin(dir.path().join("no-such-mysql"))
            .import(&config(), "x", &sql)
            .await
            .unwrap_err();
        match err {
            MysqlError::Import { message, .. } => assert!(message.contains("not found")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_client_surfaces_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let sql = dir.path().join("dump.sql");
        tokio::fs::write(&sql, "SELECT 1;").await.unwrap();

        let bin = dir.path().join("fake-mysql");
        tokio::fs::write(&bin, "#!/bin/sh\necho \"ERROR 1049: Unknown database\" >&2\nexit 1\n")
            .await
            .unwrap();
        tokio::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755))
            .await
            .unwrap();

        let err = SqlImporter::new()
            .mysql_bin(&bin)
            .import(&config(), "x", &sql)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown database"));
    }
}
