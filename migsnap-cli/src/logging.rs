//! Log subscriber setup.
//!
//! Library crates only emit `tracing` events; the binary decides where they go.
//! `MIGSNAP_LOG` takes an `EnvFilter` directive (`debug`, `migsnap_mysql=trace`, ...)
//! and defaults to `warn`. `--verbose` raises the default to `debug`.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "MIGSNAP_LOG";

static INIT: Once = Once::new();

/// Default directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Build the filter from `MIGSNAP_LOG`, falling back to the default.
pub fn filter(verbose: bool) -> EnvFilter {
    let fallback = default_directive(verbose);
    match std::env::var(LOG_ENV) {
        Ok(directive) if !verbose => {
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(fallback))
        }
        _ => EnvFilter::new(fallback),
    }
}

/// Install the stderr subscriber. Subsequent calls are no-ops.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(filter(verbose))
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init();
        tracing::debug!(verbose, "Logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_verbose_filter() {
        assert_eq!(filter(true).to_string(), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }
}
