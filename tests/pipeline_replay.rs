//! Full probe replayed from a recorded cassette.
//!
//! The cassette holds the traffic of one run: the profile query, the tree
//! query and the raw file downloads. Replaying it twice against fresh cache
//! roots must produce byte-identical results.

use std::path::Path;

use serde_json::{json, Value};

use repoprobe::analysis::{analyse_user, AnalysisResult};
use repoprobe::cassette::recorder::CassetteRecorder;
use repoprobe::config::Settings;
use repoprobe::context::ServiceContext;

fn graphql_ok(data: &Value) -> Value {
    json!({"ok": {"status": 200, "body": json!({"data": data}).to_string()}})
}

fn file(body: &str) -> Value {
    json!({"ok": {"status": 200, "body": body}})
}

fn profile() -> Value {
    let repo = |name: &str, primary: Option<&str>, langs: &[&str]| {
        json!({
            "nameWithOwner": name,
            "stargazerCount": 10,
            "forkCount": 2,
            "primaryLanguage": primary.map(|p| json!({"name": p})),
            "languages": {"edges": langs.iter().map(|l| json!({"size": 10, "node": {"name": l}})).collect::<Vec<_>>()}
        })
    };
    json!({"user": {
        "name": "Mona", "twitterUsername": "mona", "username": "mona",
        "createdAt": "2015-03-01T00:00:00Z", "updatedAt": "2024-06-01T00:00:00Z",
        "location": "Remote", "bio": "Frontend",
        "socialAccounts": {"nodes": []},
        "isDeveloperProgramMember": true,
        "oneYearContributionsStats": {
            "startedAt": "2023-06-01T00:00:00Z", "endedAt": "2024-06-01T00:00:00Z",
            "restrictedContributionsCount": 4, "totalIssueContributions": 1,
            "totalCommitContributions": 300, "totalPullRequestContributions": 12,
            "totalPullRequestReviewContributions": 6, "totalRepositoryContributions": 2,
            "totalRepositoriesWithContributedIssues": 1, "totalRepositoriesWithContributedCommits": 5,
            "totalRepositoriesWithContributedPullRequests": 3,
            "totalRepositoriesWithContributedPullRequestReviews": 2,
            "popularIssueContribution": null,
            "popularPullRequestContribution": {
                "isRestricted": false,
                "pullRequest": {
                    "url": "https://example.test/pr/1", "title": "Add dark mode",
                    "createdAt": "2024-01-10T00:00:00Z", "changedFiles": 7,
                    "reviewDecision": "APPROVED"
                }
            },
            "hasAnyContributions": true
        },
        "topRepositories": {"nodes": [
            repo("mona/vite-fork", Some("TypeScript"), &["TypeScript"]),
            repo("mona/notes", Some("Markdown"), &["Markdown"]),
            repo("mona/dashboard", Some("HTML"), &["HTML", "JavaScript"])
        ]},
        "followers": {"totalCount": 50}, "following": {"totalCount": 5},
        "starredRepositories": {"totalCount": 80},
        "recentlyContributedTo": {"nodes": [repo("acme/ui", Some("TypeScript"), &["TypeScript"])]},
        "repositories": {"totalCount": 3, "nodes": [{"stargazerCount": 10}, {"stargazerCount": 10}, {"stargazerCount": 10}]},
        "hasSponsorsListing": true, "totalSponsorshipAmountAsSponsorInCents": 1500,
        "sponsors": {"totalCount": 2}, "sponsoring": {"totalCount": 1}
    }})
}

fn tree() -> Value {
    let blob = |name: &str| json!({"name": name, "type": "blob", "object": {}});
    json!({"repository": {
        "defaultBranchRef": {"name": "main"},
        "object": {"entries": [
            blob("README.md"),
            {"name": "src", "type": "tree", "object": {"entries": [
                {"name": "components", "type": "tree", "object": {"entries": [
                    blob("Chart.jsx"),
                    blob("chart.css")
                ]}},
                blob("store.js"),
                {"name": "vendor", "type": "commit", "object": null}
            ]}},
            blob("vite.config.ts")
        ]}
    }})
}

const CHART: &str = "\
import React from 'react';
// Renders the main chart
const useSeries = () => fetchSeries();
class Chart extends React.Component {}
";

const STORE: &str = "\
var state = {};
const MAX_ITEMS = 50;
export function reducer(action) {}
/* legacy */
";

fn record_cassette(path: &Path) {
    record_cassette_with(path, 1);
}

fn record_cassette_with(path: &Path, config_misses: usize) {
    let mut rec = CassetteRecorder::new(path, "mona-dashboard", "https://api.github.com/graphql");
    rec.record("http", "post_graphql", json!({"variables": {"username": "mona"}}), graphql_ok(&profile()));
    rec.record(
        "http",
        "post_graphql",
        json!({"variables": {"owner": "mona", "repo": "dashboard"}}),
        graphql_ok(&tree()),
    );
    rec.record("http", "get", json!({"url": "src/components/Chart.jsx"}), file(CHART));
    rec.record("http", "get", json!({"url": "src/store.js"}), file(STORE));
    for _ in 0..config_misses {
        rec.record(
            "http",
            "get",
            json!({"url": "vite.config.ts"}),
            json!({"ok": {"status": 404, "body": "404: Not Found"}}),
        );
    }
    rec.finish().unwrap();
}

fn replay_once(cassette: &Path, cache_root: &Path) -> AnalysisResult {
    let settings = Settings { cache_root: cache_root.to_path_buf(), ..Settings::default() };
    let ctx = ServiceContext::replaying(settings, cassette).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    runtime.block_on(analyse_user(&ctx, "mona", false, 100)).unwrap()
}

#[test]
fn replayed_probe_is_deterministic() {
    let dir = tempfile::TempDir::new().unwrap();
    let cassette = dir.path().join("http.cassette.yaml");
    record_cassette(&cassette);

    let first = replay_once(&cassette, &dir.path().join("cache-a"));
    let second = replay_once(&cassette, &dir.path().join("cache-b"));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn replayed_probe_selects_repository_and_flattens_features() {
    let dir = tempfile::TempDir::new().unwrap();
    let cassette = dir.path().join("http.cassette.yaml");
    record_cassette(&cassette);

    let result = replay_once(&cassette, &dir.path().join("cache"));

    // The fork is skipped; the HTML repository qualifies by its breakdown.
    assert_eq!(result.analysed_repo, "mona/dashboard");
    assert_eq!(result.user_stats.total_stars_received, 30);
    assert_eq!(result.user_stats.recently_contributed_repositories.len(), 1);

    let paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["/src/components/Chart.jsx", "/src/store.js"]);

    assert_eq!(
        result.summary,
        "/src/components/Chart.jsx file contains:\n  \
         comments: Renders the main chart at line 2\n  \
         classes: Chart at line 4\n  \
         arrowFunctions: useSeries at line 3\n  \
         constants: useSeries at line 3\n  \
         components: Chart at line 4\n  \
         hooks: useSeries at line 3\n\
         /src/store.js file contains:\n  \
         comments: legacy at line 4\n  \
         functions: reducer at line 3\n  \
         globalVariables: state at line 1\n  \
         constants: MAX_ITEMS at line 2"
    );
}

#[test]
fn second_run_is_served_from_cache() {
    let dir = tempfile::TempDir::new().unwrap();
    let cassette = dir.path().join("http.cassette.yaml");
    // Only the unavailable file misses the cache on the second run, so the
    // cassette carries one more reply for it and nothing else.
    record_cassette_with(&cassette, 2);
    let cache = dir.path().join("cache");

    let settings = Settings { cache_root: cache.clone(), ..Settings::default() };
    let ctx = ServiceContext::replaying(settings, &cassette).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

    let first = runtime.block_on(analyse_user(&ctx, "mona", false, 100)).unwrap();
    assert!(cache.join("mona.entry").exists());
    assert!(cache.join("-mona-dashboard.entry").exists());
    assert!(cache.join("files/mona/dashboard/main/src/store.js.entry").exists());
    assert!(!cache.join("files/mona/dashboard/main/vite.config.ts.entry").exists());

    let second = runtime.block_on(analyse_user(&ctx, "mona", false, 100)).unwrap();
    assert_eq!(first, second);
}
