//! `migsnap import` command - Load a SQL dump and generate migrations from it.

use std::path::Path;
use std::time::Instant;

use migsnap_migrate::FkMode;
use migsnap_mysql::{MysqlCatalog, MysqlConfig, MysqlPool, SqlImporter, TempDatabase};

use crate::cli::ImportArgs;
use crate::config::load_config;
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

use super::{GenerationSummary, close_pool, generate_migrations, introspect, report_files};

const STEPS: usize = 5;

/// Run the import command
pub async fn run(args: ImportArgs) -> CliResult<()> {
    let started = Instant::now();
    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd)?;

    if !args.sql.is_file() {
        return Err(CliError::Config(format!(
            "SQL file not found: {}",
            args.sql.display()
        )));
    }

    let url = args
        .url
        .clone()
        .or_else(|| config.database.url.clone())
        .ok_or_else(|| {
            CliError::Config(
                "no server URL; pass --url, set MIGSNAP_DATABASE_URL or add [database] url to migsnap.toml"
                    .to_string(),
            )
        })?;
    let server_config = MysqlConfig::from_url(&url)?.without_database();

    let temp_name = args
        .database
        .clone()
        .unwrap_or_else(|| config.generator.temp_database.clone());
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.generator.output.clone());
    let mode: FkMode = args.fk.map(Into::into).unwrap_or(config.generator.fk_mode);
    let excluded = config.excluded_tables(&args.except);

    let mut importer = SqlImporter::new();
    if let Some(bin) = args.mysql_bin.clone().or_else(|| config.database.mysql_bin.clone()) {
        importer = importer.mysql_bin(bin);
    }

    output::header("Import SQL Dump");
    output::kv("File", &args.sql.display().to_string());
    output::kv("Server", &server_config.display_address());
    output::kv("Temporary database", &temp_name);
    output::kv("Output", &output_dir.display().to_string());
    output::kv("Foreign keys", mode.as_str());
    output::newline();

    let pool = MysqlPool::new(server_config);

    output::step(1, STEPS, &format!("Creating temporary database '{temp_name}'..."));
    let temp = match TempDatabase::create(pool.clone(), temp_name.as_str()).await {
        Ok(temp) => temp,
        Err(e) => {
            close_pool(pool).await;
            return Err(e.into());
        }
    };

    let outcome = load_and_generate(
        &pool,
        &temp,
        &importer,
        &args.sql,
        &excluded,
        &output_dir,
        mode,
    )
    .await;

    let cleanup: CliResult<()> = if args.drop_temp {
        output::step(5, STEPS, &format!("Dropping temporary database '{temp_name}'..."));
        temp.remove().await.map_err(CliError::from)
    } else {
        output::step(5, STEPS, "Keeping temporary database");
        output::warn(&format!(
            "Temporary database '{temp_name}' was kept; pass --drop-temp to remove it"
        ));
        Ok(())
    };
    close_pool(pool).await;

    let summary = outcome?;
    cleanup?;

    report_files(&summary, &cwd);
    output::newline();
    success(&format!(
        "Generated {} migrations for {} tables in {:.2}s",
        summary.files.len(),
        summary.tables,
        started.elapsed().as_secs_f64()
    ));

    Ok(())
}

async fn load_and_generate(
    pool: &MysqlPool,
    temp: &TempDatabase,
    importer: &SqlImporter,
    sql: &Path,
    excluded: &[String],
    output_dir: &Path,
    mode: FkMode,
) -> CliResult<GenerationSummary> {
    output::step(2, STEPS, "Importing dump...");
    importer
        .import(pool.config(), temp.name(), sql)
        .await
        .map_err(CliError::import)?;

    output::step(3, STEPS, "Introspecting schema...");
    let catalog = MysqlCatalog::for_database(pool.clone(), temp.name());
    let result = introspect(&catalog).await?;

    output::step(4, STEPS, "Writing migrations...");
    generate_migrations(result, excluded, output_dir, mode).await
}
