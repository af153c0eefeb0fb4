//! `repoprobe analyse` command.

use crate::analysis::{analyse_user, AnalysisError, AnalysisResult};
use crate::context::ServiceContext;

use super::block_on;

/// Runs the probe with an optional per-invocation budget override.
pub(crate) fn probe(
    ctx: &ServiceContext,
    username: &str,
    no_cache: bool,
    budget: Option<u64>,
) -> Result<AnalysisResult, String> {
    let budget = budget.map_or(ctx.settings.file_budget, |b| {
        usize::try_from(b).unwrap_or(usize::MAX)
    });
    block_on(analyse_user(ctx, username, no_cache, budget))?.map_err(|e| describe(&e))
}

/// One-line rendering of a failed run, status code first.
pub(crate) fn describe(err: &AnalysisError) -> String {
    format!("[{}] {err}", err.status_code())
}

/// Execute the `analyse` command.
///
/// Prints the summary text, or the full result as JSON with `--json`.
///
/// # Errors
///
/// Returns an error string if the run produced no analysis.
pub fn run(
    ctx: &ServiceContext,
    username: &str,
    no_cache: bool,
    budget: Option<u64>,
    json: bool,
) -> Result<(), String> {
    let result = probe(ctx, username, no_cache, budget)?;
    if json {
        let encoded = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to encode analysis: {e}"))?;
        println!("{encoded}");
    } else {
        eprintln!("Analysed {} ({} files)", result.analysed_repo, result.files.len());
        println!("{}", result.summary);
    }
    Ok(())
}
