//! Shared fixtures for unit tests.

use std::path::Path;

use serde_json::{json, Value};

use crate::cassette::recorder::CassetteRecorder;
use crate::config::Settings;
use crate::context::ServiceContext;

/// Builds a replaying context whose http port serves `calls` in order per
/// method. The cache is rooted at `<dir>/cache`.
pub(crate) fn replay_context(dir: &Path, calls: &[(&str, Value)]) -> ServiceContext {
    replay_context_with(dir, calls, Settings::default())
}

/// As [`replay_context`], starting from `settings`.
pub(crate) fn replay_context_with(
    dir: &Path,
    calls: &[(&str, Value)],
    settings: Settings,
) -> ServiceContext {
    let path = dir.join("http.cassette.yaml");
    let mut rec = CassetteRecorder::new(&path, "unit", "local");
    for (method, output) in calls {
        rec.record("http", *method, json!(null), output.clone());
    }
    rec.finish().unwrap();
    let settings = Settings { cache_root: dir.join("cache"), ..settings };
    ServiceContext::replaying(settings, &path).unwrap()
}

/// A successful GraphQL reply as the http port records it.
pub(crate) fn graphql_ok(data: &Value) -> Value {
    json!({"ok": {"status": 200, "body": json!({"data": data}).to_string()}})
}

/// A raw-content reply as the http port records it.
pub(crate) fn raw(status: u16, body: &str) -> Value {
    json!({"ok": {"status": status, "body": body}})
}

/// A `RepoDetails` fragment.
pub(crate) fn repo(name: &str, primary: Option<&str>, langs: &[&str]) -> Value {
    json!({
        "nameWithOwner": name,
        "stargazerCount": 1,
        "forkCount": 0,
        "primaryLanguage": primary.map(|p| json!({"name": p})),
        "languages": {
            "edges": langs.iter().map(|l| json!({"size": 100, "node": {"name": l}})).collect::<Vec<_>>()
        }
    })
}

/// A minimal but complete `data.user` payload.
pub(crate) fn user_payload(login: &str, top: &[Value]) -> Value {
    json!({
        "name": "The Octocat",
        "twitterUsername": null,
        "username": login,
        "createdAt": "2011-01-25T18:44:36Z",
        "updatedAt": "2024-05-01T12:00:00Z",
        "location": "San Francisco",
        "bio": null,
        "socialAccounts": {"nodes": [
            {"displayName": "@octo", "provider": "MASTODON", "url": "https://mastodon.social/@octo"}
        ], "totalCount": 1},
        "isDeveloperProgramMember": false,
        "oneYearContributionsStats": {
            "startedAt": "2023-05-01T00:00:00Z",
            "endedAt": "2024-05-01T00:00:00Z",
            "restrictedContributionsCount": 0,
            "totalIssueContributions": 3,
            "totalCommitContributions": 120,
            "totalPullRequestContributions": 8,
            "totalPullRequestReviewContributions": 2,
            "totalRepositoryContributions": 1,
            "totalRepositoriesWithContributedIssues": 2,
            "totalRepositoriesWithContributedCommits": 4,
            "totalRepositoriesWithContributedPullRequests": 3,
            "totalRepositoriesWithContributedPullRequestReviews": 1,
            "popularIssueContribution": null,
            "popularPullRequestContribution": null,
            "hasAnyContributions": true
        },
        "topRepositories": {"nodes": top},
        "followers": {"totalCount": 10},
        "following": {"totalCount": 2},
        "starredRepositories": {"totalCount": 7},
        "recentlyContributedTo": {"nodes": [null]},
        "repositories": {"totalCount": 3, "nodes": [
            {"url": "u1", "stargazerCount": 40},
            null,
            {"url": "u2", "stargazerCount": 2}
        ]},
        "hasSponsorsListing": false,
        "totalSponsorshipAmountAsSponsorInCents": null,
        "sponsors": {"totalCount": 0},
        "sponsoring": {"totalCount": 1}
    })
}
