//! `pyime`: drive the Pinyin input session from the command line.

pub mod commands;
pub mod script;

use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "pinyin=debug" } else { "pinyin=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
