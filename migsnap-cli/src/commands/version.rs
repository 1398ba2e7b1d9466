//! `migsnap version` command - Display version information.

use crate::config::{CONFIG_FILE_NAME, DEFAULT_EXCLUDES};
use crate::error::CliResult;
use crate::output::{self, kv};

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command
pub async fn run() -> CliResult<()> {
    output::header("migsnap");

    kv("Version", VERSION);

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    kv("Build", build_mode);
    kv("Target", "Laravel (PHP) migrations");
    kv("Config file", CONFIG_FILE_NAME);
    kv("Always skipped", &DEFAULT_EXCLUDES.join(", "));

    output::newline();
    output::section("Components");
    kv("migsnap-schema", VERSION);
    kv("migsnap-migrate", VERSION);
    kv("migsnap-mysql", VERSION);

    Ok(())
}
