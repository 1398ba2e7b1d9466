//! `migsnap generate` command - Generate migrations from an existing database.

use std::time::Instant;

use migsnap_migrate::{FkMode, SchemaReader};
use migsnap_mysql::{MysqlCatalog, MysqlConfig, MysqlPool};

use crate::cli::GenerateArgs;
use crate::config::load_config;
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

use super::{close_pool, generate_migrations, introspect, report_files};

/// Run the generate command
pub async fn run(args: GenerateArgs) -> CliResult<()> {
    let started = Instant::now();
    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd)?;

    let url = args
        .url
        .clone()
        .or_else(|| config.database.url.clone())
        .ok_or_else(|| {
            CliError::Config(
                "no database URL; pass --url, set MIGSNAP_DATABASE_URL or add [database] url to migsnap.toml"
                    .to_string(),
            )
        })?;
    let mysql_config = MysqlConfig::from_url(&url)?;
    let database = mysql_config.require_database()?.to_string();

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.generator.output.clone());
    let mode: FkMode = args.fk.map(Into::into).unwrap_or(config.generator.fk_mode);
    let excluded = config.excluded_tables(&args.except);

    let pool = MysqlPool::new(mysql_config);
    let catalog = MysqlCatalog::new(pool.clone())?;

    if args.dump_schema {
        let result = SchemaReader::new().read(&catalog).await;
        close_pool(pool).await;
        let mut result = result.map_err(CliError::introspection)?;
        result.schema.exclude(excluded.iter().map(String::as_str));
        println!("{}", serde_json::to_string_pretty(&result.schema)?);
        return Ok(());
    }

    output::header("Generate Laravel Migrations");
    output::kv("Server", &catalog.pool().config().display_address());
    output::kv("Database", &database);
    output::kv("Output", &output_dir.display().to_string());
    output::kv("Foreign keys", mode.as_str());
    output::newline();

    output::step(1, 2, "Introspecting database...");
    let result = match introspect(&catalog).await {
        Ok(result) => result,
        Err(e) => {
            close_pool(pool).await;
            return Err(e);
        }
    };

    output::step(2, 2, "Writing migrations...");
    let summary = generate_migrations(result, &excluded, &output_dir, mode).await;
    close_pool(pool).await;
    let summary = summary?;

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
