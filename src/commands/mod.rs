//! Command dispatch and handlers.

pub mod analyse;
pub mod ask;
pub mod profile;
pub mod serve;

use std::env;
use std::future::Future;
use std::path::Path;

use crate::cassette::format::CassetteSource;
use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Settings;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `REPOPROBE_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if settings are invalid or the handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let settings = Settings::from_env().map_err(|e| e.to_string())?;

    let Some(dir) = env::var_os("REPOPROBE_RECORD").filter(|d| !d.is_empty()) else {
        return dispatch_with_context(command, ServiceContext::live(settings));
    };

    let session = RecordingSession::new(Path::new(&dir), &CassetteSource::from(&settings))?;
    // The handler consumes the context, releasing the recorders before finish.
    let result = dispatch_with_context(command, ServiceContext::recording(settings, &session));
    finish_recording(session)?;
    result
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(command: &Command, ctx: ServiceContext) -> Result<(), String> {
    match command {
        Command::Profile { username, cache } => profile::run(&ctx, username, cache.no_cache),
        Command::Analyse { username, cache, budget, json } => {
            analyse::run(&ctx, username, cache.no_cache, *budget, *json)
        }
        Command::Ask { username, question, cache } => {
            ask::run(&ctx, username, question, cache.no_cache)
        }
        Command::Serve { addr } => serve::run(ctx, addr),
    }
}

/// Drives `future` to completion on a single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
