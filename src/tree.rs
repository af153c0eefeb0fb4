//! Repository selection and tree walking.
//!
//! The code host returns a nested directory listing a fixed number of levels
//! deep. [`parse_tree`] turns it into [`TreeNode`]s holding only candidate
//! source files, and [`Files`] walks those depth-first in listing order.
//! That order is the fetch order and the order of the final summary.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::ServiceContext;
use crate::github::queries::TREE_QUERY;
use crate::github::types::{RawTree, RepoSummary, TreeData};
use crate::github::RemoteError;

/// Extensions of files worth scanning.
pub const SOURCE_EXTENSIONS: [&str; 4] = [".js", ".ts", ".jsx", ".tsx"];
/// Languages a target repository must be written in.
pub const TARGET_LANGUAGES: [&str; 2] = ["JavaScript", "TypeScript"];
/// Name suffix marking a repository as a fork of convenience.
pub const FORK_SUFFIX: &str = "-fork";
/// Branch used when the repository reports no default branch.
pub const FALLBACK_BRANCH: &str = "HEAD";

/// A candidate source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Base name, e.g. `App.tsx`.
    pub name: String,
    /// `/`-rooted path, e.g. `/src/App.tsx`.
    pub path: String,
}

/// A directory and its retained children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    /// Base name.
    pub name: String,
    /// `/`-rooted path without a trailing separator.
    pub path: String,
    /// Children in listing order.
    pub children: Vec<TreeNode>,
}

/// One node of a walked tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// A file kept for scanning.
    Blob(FileDescriptor),
    /// A directory. Never pruned, even when it ends up empty.
    Tree(Directory),
}

/// The walked tree of a repository, as cached under `-<owner>-<repo>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryTree {
    /// Branch used for raw downloads.
    pub branch: String,
    /// Top-level nodes.
    pub entries: Vec<TreeNode>,
}

impl RepositoryTree {
    /// Depth-first iterator over every file in the tree.
    #[must_use]
    pub fn files(&self) -> Files<'_> {
        Files::new(&self.entries)
    }
}

/// Whether `name` ends with one of [`SOURCE_EXTENSIONS`].
#[must_use]
pub fn is_source_file(name: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Converts a raw listing into retained nodes, in listing order.
///
/// Directories recurse with `prefix + name + "/"`. Files are kept only when
/// [`is_source_file`] holds. Entries without a type, or with a type other
/// than `blob`/`tree`, are skipped.
#[must_use]
pub fn parse_tree(raw: &RawTree, prefix: &str) -> Vec<TreeNode> {
    let mut nodes = Vec::with_capacity(raw.entries.len());
    for entry in raw.entries.iter().flatten() {
        let path = format!("{prefix}{}", entry.name);
        match entry.kind.as_deref() {
            Some("tree") => {
                let children = entry
                    .object
                    .as_ref()
                    .map(|object| parse_tree(object, &format!("{path}/")))
                    .unwrap_or_default();
                nodes.push(TreeNode::Tree(Directory { name: entry.name.clone(), path, children }));
            }
            Some("blob") if is_source_file(&entry.name) => {
                nodes.push(TreeNode::Blob(FileDescriptor { name: entry.name.clone(), path }));
            }
            _ => {}
        }
    }
    nodes
}

/// Lazy depth-first walk over the files of a node list.
///
/// Stopping the iterator stops the walk; nothing past the last yielded file
/// is visited.
pub struct Files<'a> {
    stack: Vec<std::slice::Iter<'a, TreeNode>>,
}

impl<'a> Files<'a> {
    /// Starts a walk over `nodes`.
    #[must_use]
    pub fn new(nodes: &'a [TreeNode]) -> Self {
        Self { stack: vec![nodes.iter()] }
    }
}

impl<'a> Iterator for Files<'a> {
    type Item = &'a FileDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(TreeNode::Blob(file)) => return Some(file),
                Some(TreeNode::Tree(dir)) => self.stack.push(dir.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

fn is_target_language(name: &str) -> bool {
    TARGET_LANGUAGES.contains(&name)
}

/// Picks the first repository, in the given order, that is not a fork of
/// convenience and is written in a target language.
///
/// The primary language is checked first, then the language breakdown.
#[must_use]
pub fn find_target_repository(candidates: &[RepoSummary]) -> Option<&RepoSummary> {
    candidates.iter().find(|repo| {
        !repo.name_with_owner.ends_with(FORK_SUFFIX)
            && (repo.primary_language.as_ref().is_some_and(|l| is_target_language(&l.name))
                || repo.languages.iter().any(|l| is_target_language(&l.name)))
    })
}

/// Fetches and walks the `HEAD:` tree of `owner/repo`.
///
/// The walked tree is cached under `-<owner>-<repo>`. A repository the host
/// reports as null yields an empty tree rather than an error.
///
/// # Errors
///
/// Returns any classified remote failure.
pub async fn fetch_repository_tree(
    ctx: &ServiceContext,
    owner: &str,
    repo: &str,
    bypass: bool,
) -> Result<RepositoryTree, RemoteError> {
    let (owner, repo) = (owner.trim(), repo.trim());
    let key = format!("-{owner}-{repo}");
    let cache = ctx.cache();
    if let Some(tree) = cache.read_json::<RepositoryTree>(&key, bypass) {
        return Ok(tree);
    }

    let data: TreeData =
        ctx.github().query_as(TREE_QUERY, json!({ "owner": owner, "repo": repo })).await?;
    let tree = match data.repository {
        Some(repository) => RepositoryTree {
            branch: repository
                .default_branch_ref
                .map_or_else(|| FALLBACK_BRANCH.to_string(), |r| r.name),
            entries: repository.object.map(|root| parse_tree(&root, "/")).unwrap_or_default(),
        },
        None => {
            tracing::warn!(owner, repo, "repository not visible; treating as empty");
            RepositoryTree { branch: FALLBACK_BRANCH.to_string(), entries: Vec::new() }
        }
    };

    tracing::info!(owner, repo, branch = %tree.branch, files = tree.files().count(), "tree walked");
    cache.store_json(&key, &tree);
    Ok(tree)
}
