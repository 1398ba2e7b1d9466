//! CLI command implementations.

pub mod generate;
pub mod import;
pub mod version;

use std::path::{Path, PathBuf};

use migsnap_migrate::{
    ArtifactWriter, Catalog, FkMode, GenerationContext, IntrospectionResult, MigrationRenderer,
    SchemaReader, approximated_columns, typemap::FALLBACK_STRING_LENGTH,
};
use migsnap_mysql::MysqlPool;

use crate::error::{CliError, CliResult};
use crate::output;

/// What one generation pass produced.
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    /// Tables rendered.
    pub tables: usize,
    /// Columns across the rendered tables.
    pub columns: usize,
    /// Foreign keys across the rendered tables.
    pub foreign_keys: usize,
    /// Tables removed by the exclusion list.
    pub excluded: Vec<String>,
    /// Files written, in artifact order.
    pub files: Vec<PathBuf>,
}

/// Read `catalog`, reporting warnings as they surface.
pub async fn introspect<C>(catalog: &C) -> CliResult<IntrospectionResult>
where
    C: Catalog + ?Sized,
{
    let result = SchemaReader::new()
        .read(catalog)
        .await
        .map_err(CliError::introspection)?;

    for warning in &result.warnings {
        output::warn(warning);
    }
    Ok(result)
}

/// Exclude tables, render every migration and write them to `output_dir`.
pub async fn generate_migrations(
    mut result: IntrospectionResult,
    excluded_tables: &[String],
    output_dir: &Path,
    mode: FkMode,
) -> CliResult<GenerationSummary> {
    let excluded = result
        .schema
        .exclude(excluded_tables.iter().map(String::as_str))
        .into_iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>();
    tracing::debug!(?excluded, "Excluded tables");

    for approx in approximated_columns(&result.schema) {
        output::warn(&format!(
            "{}.{}: '{}' has no direct mapping, generated as string({})",
            approx.table, approx.column, approx.full_type, FALLBACK_STRING_LENGTH
        ));
    }

    let artifacts =
        MigrationRenderer::new().render(&result.schema, &GenerationContext::now(), mode);

    let files = ArtifactWriter::new(output_dir).write_all(&artifacts).await?;

    let stats = result.schema.stats();
    Ok(GenerationSummary {
        tables: stats.table_count,
        columns: stats.column_count,
        foreign_keys: stats.foreign_key_count,
        excluded,
        files,
    })
}

/// Close `pool`, logging rather than failing.
pub async fn close_pool(pool: MysqlPool) {
    if let Err(e) = pool.disconnect().await {
        tracing::debug!(error = %e, "Failed to close connection pool");
    }
}

/// Print the files written relative to `cwd`.
pub fn report_files(summary: &GenerationSummary, cwd: &Path) {
    output::newline();
    output::section("Generated migrations");
    for file in &summary.files {
        let relative = file.strip_prefix(cwd).unwrap_or(file).display().to_string();
        output::list_item(&relative);
    }
    output::newline();
    output::info(&format!(
        "{} tables, {} columns, {} foreign keys",
        summary.tables, summary.columns, summary.foreign_keys
    ));
    if !summary.excluded.is_empty() {
        output::newline();
        output::dim(&format!("Skipped tables: {}", summary.excluded.join(", ")));
    }
}
