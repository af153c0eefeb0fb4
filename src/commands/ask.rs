//! `repoprobe ask` command.

use crate::assistant::ask;
use crate::context::ServiceContext;

use super::analyse::{describe, probe};
use super::block_on;

/// Execute the `ask` command: probe the user, then answer `question`.
///
/// # Errors
///
/// Returns an error string if the probe or the model call fails.
pub fn run(
    ctx: &ServiceContext,
    username: &str,
    question: &str,
    no_cache: bool,
) -> Result<(), String> {
    let result = probe(ctx, username, no_cache, None)?;
    let answer = block_on(ask(ctx, &result.summary, question))?.map_err(|e| describe(&e))?;
    println!("{}", answer.message);
    Ok(())
}
