//! User profile lookup.

use serde_json::json;

use crate::context::ServiceContext;
use crate::github::queries::USER_QUERY;
use crate::github::types::{UserData, UserProfile};
use crate::github::RemoteError;

/// Fetches and formats the public profile of `username`.
///
/// The formatted profile is cached under the trimmed username; `bypass`
/// forces a refetch but the result is still written back.
///
/// # Errors
///
/// Returns [`RemoteError::NotFound`] when the login does not exist, or any
/// other classified remote failure.
pub async fn fetch_user_profile(
    ctx: &ServiceContext,
    username: &str,
    bypass: bool,
) -> Result<UserProfile, RemoteError> {
    let username = username.trim();
    let cache = ctx.cache();
    if let Some(profile) = cache.read_json::<UserProfile>(username, bypass) {
        return Ok(profile);
    }

    let data: UserData =
        ctx.github().query_as(USER_QUERY, json!({ "username": username })).await?;
    let raw = data.user.ok_or_else(|| RemoteError::NotFound { path: username.to_string() })?;
    let profile = UserProfile::from(raw);

    tracing::info!(
        username,
        repositories = profile.total_repositories,
        top = profile.top_repositories.len(),
        "profile fetched"
    );
    cache.store_json(username, &profile);
    Ok(profile)
}
