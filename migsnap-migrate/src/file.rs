//! Artifact file output.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MigrateResult, MigrationError};
use crate::render::Artifact;

/// Writes rendered artifacts into one directory.
///
/// Writes are sequential and not transactional: when one fails, the files
/// written before it stay on disk.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer for `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Get the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Ensure the output directory exists.
    pub async fn ensure_dir(&self) -> MigrateResult<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| MigrationError::OutputDirectory {
                path: self.output_dir.clone(),
                source,
            })
    }

    /// Path an artifact is written to.
    pub fn path_for(&self, artifact: &Artifact) -> PathBuf {
        self.output_dir.join(&artifact.file_name)
    }

    /// Write one artifact, replacing any file of the same name.
    pub async fn write(&self, artifact: &Artifact) -> MigrateResult<PathBuf> {
        let path = self.path_for(artifact);
        tokio::fs::write(&path, artifact.contents())
            .await
            .map_err(|source| MigrationError::Filesystem {
                artifact: artifact.name.clone(),
                table: artifact.table.as_ref().map(|t| t.to_string()),
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "Wrote artifact");
        Ok(path)
    }

    /// Create the directory and write every artifact in order, stopping at the
    /// first failure.
    pub async fn write_all(&self, artifacts: &[Artifact]) -> MigrateResult<Vec<PathBuf>> {
        self.ensure_dir().await?;
        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            written.push(self.write(artifact).await?);
        }
        Ok(written)
    }
}
