//! `repoprobe profile` command.

use crate::context::ServiceContext;
use crate::profile::fetch_user_profile;

use super::block_on;

/// Execute the `profile` command: print the formatted profile as JSON.
///
/// # Errors
///
/// Returns an error string if the lookup fails.
pub fn run(ctx: &ServiceContext, username: &str, no_cache: bool) -> Result<(), String> {
    let profile = block_on(fetch_user_profile(ctx, username, no_cache))?
        .map_err(|e| format!("[{}] {e}", e.status_code()))?;
    let json = serde_json::to_string_pretty(&profile)
        .map_err(|e| format!("Failed to encode profile: {e}"))?;
    println!("{json}");
    Ok(())
}
