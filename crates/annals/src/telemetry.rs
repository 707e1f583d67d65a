//! Logging and environment setup for the `annals` binary.

use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise annals crates log at `info`, or
/// `debug` with `verbose`. `json` switches to one JSON object per line.
/// Logs go to stderr so command output stays on stdout.
pub fn init_logging(verbose: bool, json: bool) {
    let default = if verbose {
        "warn,annals=debug,annals_book=debug,annals_models=debug,annals_images=debug,annals_core=debug"
    } else {
        "warn,annals=info,annals_book=info,annals_models=info,annals_images=info,annals_core=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Loads `.env` from `path`, or from the current directory upward.
///
/// A missing file is normal and yields `None`. Any other failure is returned
/// so the caller can report it once logging is up.
pub fn load_dotenv(path: Option<&Path>) -> Option<dotenvy::Error> {
    let result = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    result.err().filter(|e| !e.not_found())
}
