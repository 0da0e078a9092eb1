//! # apigen-cli
//!
//! Command-line front end for [`apigen_core`].
//!
//! | Command | Description |
//! |---------|-------------|
//! | `apigen make <name> [version]` | Generate the CRUD API components of a resource |
//! | `apigen plan <name> [version]` | Show what `make` would write, without writing |
//!
//! - [`commands::make`] runs the generator and reports each artifact
//! - [`commands::plan`] is the dry run
//! - [`commands::prompt`] asks before a model is overwritten

pub mod commands;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks `warn`, `info` or
/// `debug`.
pub fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
