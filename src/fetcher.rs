//! Bounded resolution of tree files to their text.

use crate::context::ServiceContext;
use crate::tree::{FileDescriptor, RepositoryTree};

/// A file and its downloaded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Where the text came from.
    pub file: FileDescriptor,
    /// Raw file contents.
    pub content: String,
}

/// Cache key for one file's raw text.
#[must_use]
pub fn file_cache_key(owner: &str, repo: &str, branch: &str, path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("files/{owner}/{repo}/{branch}/{path}")
}

/// Resolves files of `tree` in walk order until `budget` of them have text.
///
/// The budget is checked before each download and the walk stops as soon as
/// it is spent, so no further directories are visited. Files that cannot be
/// downloaded are skipped without consuming a slot.
pub async fn collect(
    ctx: &ServiceContext,
    owner: &str,
    repo: &str,
    tree: &RepositoryTree,
    budget: usize,
    bypass: bool,
) -> Vec<FetchedFile> {
    let cache = ctx.cache();
    let github = ctx.github();
    let mut fetched = Vec::new();

    for file in tree.files() {
        if fetched.len() >= budget {
            tracing::debug!(budget, "file budget exhausted");
            break;
        }

        let key = file_cache_key(owner, repo, &tree.branch, &file.path);
        let content = match cache.read(&key, bypass) {
            Some(content) => content,
            None => {
                let Some(content) =
                    github.download_file(owner, repo, &file.path, &tree.branch).await
                else {
                    continue;
                };
                cache.store(&key, &content);
                content
            }
        };
        fetched.push(FetchedFile { file: file.clone(), content });
    }

    tracing::info!(owner, repo, files = fetched.len(), budget, "files fetched");
    fetched
}
