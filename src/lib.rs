//! Core library entry for the `repoprobe` CLI.
//!
//! A probe fetches a user's public profile, picks their representative
//! JavaScript/TypeScript repository, fetches a bounded set of its source
//! files through a disk cache, and flattens lexical features of those files
//! into a compact summary for a language model.

pub mod adapters;
pub mod analysis;
pub mod assistant;
pub mod cache;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod extract;
pub mod fetcher;
pub mod flatten;
pub mod github;
pub mod ports;
pub mod profile;
pub mod server;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    init_logging(cli.verbose);
    commands::dispatch(&cli.command)
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    // A second install (tests calling `run` repeatedly) is harmless.
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
