//! Logging and tracing utilities

use crate::env::load_dotenv;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,research_stock=info,stock_research=info";

/// Filter used when `RUST_LOG` is not set and verbose output was requested
pub const VERBOSE_FILTER: &str = "debug";

/// Initialize the tracing subscriber
///
/// Log lines go to stderr; stdout is reserved for the report. Calling this
/// more than once is harmless, later calls are ignored.
pub fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Load `.env`, then initialize tracing
///
/// `RUST_LOG` may come from the file, so it is read first; which file was
/// loaded is logged once the subscriber is installed.
pub fn init_environment(verbose: bool) -> Option<PathBuf> {
    let dotenv = load_dotenv();
    init_tracing(verbose);
    log_dotenv(dotenv.as_deref());
    dotenv
}

fn log_dotenv(path: Option<&Path>) {
    match path {
        Some(path) => debug!("Loaded environment from {}", path.display()),
        None => debug!("No .env file found"),
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }
}
