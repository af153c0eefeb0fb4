//! The end-to-end probe: profile, target repository, tree, bounded fetch,
//! feature extraction and the flattened summary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ServiceContext;
use crate::extract::{extract, FeatureRecord};
use crate::fetcher::{collect, FetchedFile};
use crate::flatten::render;
use crate::github::types::UserProfile;
use crate::github::RemoteError;
use crate::profile::fetch_user_profile;
use crate::tree::{fetch_repository_tree, find_target_repository};

/// Why a probe run produced no analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A remote call failed; the run stops there.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// None of the user's top repositories is a JavaScript or TypeScript one.
    #[error("no js or ts repo found in top repositories")]
    NoMatch {
        /// Profile fetched before the search.
        profile: Box<UserProfile>,
    },
    /// The chosen repository yielded no downloadable source files.
    #[error("no files found in {repository}")]
    EmptyRepository {
        /// `owner/name` of the chosen repository.
        repository: String,
        /// Profile fetched before the walk.
        profile: Box<UserProfile>,
    },
    /// The language model call failed.
    #[error("language model request failed: {0}")]
    Llm(String),
}

impl AnalysisError {
    /// HTTP-style status code reported to callers.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Remote(e) => e.status_code(),
            Self::NoMatch { .. } => 404,
            Self::EmptyRepository { .. } => 412,
            Self::Llm(_) => 502,
        }
    }

    /// Profile obtained before the run stopped, if any.
    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::NoMatch { profile } | Self::EmptyRepository { profile, .. } => Some(&**profile),
            Self::Remote(_) | Self::Llm(_) => None,
        }
    }
}

/// One scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysedFile {
    /// Base name.
    pub name: String,
    /// `/`-rooted path in the repository.
    pub path: String,
    /// What the scan found.
    pub features: FeatureRecord,
}

/// Output of a successful probe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// `owner/name` of the repository that was scanned.
    pub analysed_repo: String,
    /// Scanned files in walk order.
    pub files: Vec<AnalysedFile>,
    /// [`render`] of `files`.
    pub summary: String,
    /// The user's formatted profile.
    pub user_stats: UserProfile,
}

fn analyse_file(fetched: FetchedFile) -> AnalysedFile {
    let FetchedFile { file, content } = fetched;
    tracing::debug!(file = %file.path, "started");
    let features = extract(&file.name, &content);
    tracing::debug!(file = %file.path, "ended");
    AnalysedFile { name: file.name, path: file.path, features }
}

/// Runs the whole probe for `username`, resolving at most `budget` files.
///
/// `bypass` applies to every cache read of the run.
///
/// # Errors
///
/// Returns [`AnalysisError::NoMatch`] when no repository qualifies,
/// [`AnalysisError::EmptyRepository`] when none of its files could be
/// fetched, and [`AnalysisError::Remote`] for any remote failure.
pub async fn analyse_user(
    ctx: &ServiceContext,
    username: &str,
    bypass: bool,
    budget: usize,
) -> Result<AnalysisResult, AnalysisError> {
    let profile = fetch_user_profile(ctx, username, bypass).await?;

    let Some(target) = find_target_repository(&profile.top_repositories) else {
        tracing::info!(username, "no target repository");
        return Err(AnalysisError::NoMatch { profile: Box::new(profile) });
    };
    let repository = target.name_with_owner.clone();
    let Some((owner, name)) = target.owner_and_name() else {
        return Err(RemoteError::MalformedBody(format!(
            "repository identifier {repository:?} is not owner/name"
        ))
        .into());
    };
    tracing::info!(username, %repository, "repository chosen");

    let tree = fetch_repository_tree(ctx, owner, name, bypass).await?;
    let fetched = collect(ctx, owner, name, &tree, budget, bypass).await;
    if fetched.is_empty() {
        return Err(AnalysisError::EmptyRepository { repository, profile: Box::new(profile) });
    }

    let files: Vec<AnalysedFile> = fetched.into_iter().map(analyse_file).collect();
    let summary = render(&files);

    Ok(AnalysisResult { analysed_repo: repository, files, summary, user_stats: profile })
}
