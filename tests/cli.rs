//! Integration tests for top-level CLI behavior.

use std::net::SocketAddr;
use std::path::Path;
use std::process::Command;

use axum::extract::Path as UrlPath;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

fn repoprobe(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_repoprobe");
    let mut command = Command::new(bin);
    command.current_dir(cwd).args(args).env_remove("REPOPROBE_RECORD").env("RUST_LOG", "warn");
    // The stand-in host is local; a configured proxy must not intercept it.
    for proxy in ["HTTP_PROXY", "HTTPS_PROXY", "ALL_PROXY", "http_proxy", "https_proxy", "all_proxy"] {
        command.env_remove(proxy);
    }
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("failed to run repoprobe binary")
}

#[test]
fn help_lists_every_command() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = repoprobe(dir.path(), &["--help"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for command in ["profile", "analyse", "ask", "serve"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = repoprobe(dir.path(), &["frobnicate"], &[]);
    assert!(!output.status.success());
}

#[test]
fn analyse_without_username_shows_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = repoprobe(dir.path(), &["analyse"], &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("USERNAME"));
}

#[test]
fn invalid_budget_is_reported_before_any_request() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = repoprobe(
        dir.path(),
        &["profile", "octocat"],
        &[
            ("REPOPROBE_FILE_BUDGET", "plenty"),
            // Unroutable: reaching the network would fail differently.
            ("REPOPROBE_GRAPHQL_URL", "http://127.0.0.1:9/graphql"),
        ],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("REPOPROBE_FILE_BUDGET"), "stderr: {stderr}");
}

fn repo_details(name: &str, language: &str) -> Value {
    json!({
        "nameWithOwner": name,
        "stargazerCount": 3,
        "forkCount": 0,
        "primaryLanguage": {"name": language},
        "languages": {"edges": [{"size": 1000, "node": {"name": language}}]}
    })
}

fn user_data() -> Value {
    json!({"user": {
        "name": null, "twitterUsername": null, "username": "octocat",
        "createdAt": "2011-01-25T18:44:36Z", "updatedAt": "2024-05-01T12:00:00Z",
        "location": null, "bio": "hi",
        "socialAccounts": {"nodes": []},
        "isDeveloperProgramMember": false,
        "oneYearContributionsStats": {
            "startedAt": "2023-05-01T00:00:00Z", "endedAt": "2024-05-01T00:00:00Z",
            "restrictedContributionsCount": 0, "totalIssueContributions": 0,
            "totalCommitContributions": 0, "totalPullRequestContributions": 0,
            "totalPullRequestReviewContributions": 0, "totalRepositoryContributions": 0,
            "totalRepositoriesWithContributedIssues": 0, "totalRepositoriesWithContributedCommits": 0,
            "totalRepositoriesWithContributedPullRequests": 0,
            "totalRepositoriesWithContributedPullRequestReviews": 0,
            "popularIssueContribution": null, "popularPullRequestContribution": null,
            "hasAnyContributions": false
        },
        "topRepositories": {"nodes": [
            repo_details("octocat/tool", "Go"),
            repo_details("octocat/web", "TypeScript")
        ]},
        "followers": {"totalCount": 1}, "following": {"totalCount": 0},
        "starredRepositories": {"totalCount": 0},
        "recentlyContributedTo": {"nodes": []},
        "repositories": {"totalCount": 2, "nodes": [{"stargazerCount": 3}, {"stargazerCount": 3}]},
        "hasSponsorsListing": false, "totalSponsorshipAmountAsSponsorInCents": null,
        "sponsors": {"totalCount": 0}, "sponsoring": {"totalCount": 0}
    }})
}

fn tree_data() -> Value {
    json!({"repository": {
        "defaultBranchRef": {"name": "trunk"},
        "object": {"entries": [
            {"name": "src", "type": "tree", "object": {"entries": [
                {"name": "App.tsx", "type": "blob", "object": {}},
                {"name": "style.css", "type": "blob", "object": {}}
            ]}},
            {"name": "missing.ts", "type": "blob", "object": {}}
        ]}
    }})
}

async fn graphql(Json(request): Json<Value>) -> Json<Value> {
    let query = request["query"].as_str().unwrap_or_default();
    let data = if query.contains("user(login") { user_data() } else { tree_data() };
    Json(json!({"data": data}))
}

async fn raw_file(UrlPath(path): UrlPath<String>) -> (StatusCode, String) {
    match path.as_str() {
        "octocat/web/trunk/src/App.tsx" => (
            StatusCode::OK,
            "export default function App() {}\nfunction useClock() {}\n".to_string(),
        ),
        _ => (StatusCode::NOT_FOUND, "404: Not Found".to_string()),
    }
}

/// Starts a stand-in code host on a background thread.
fn start_fake_host() -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            let app = Router::new()
                .route("/graphql", post(graphql))
                .route("/raw/*path", get(raw_file));
            axum::serve(listener, app).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

#[test]
fn analyse_runs_against_a_live_host_and_then_from_cache() {
    let addr = start_fake_host();
    let dir = tempfile::TempDir::new().unwrap();
    let graphql_url = format!("http://{addr}/graphql");
    let raw_url = format!("http://{addr}/raw");
    let cache = dir.path().join("cache");
    let env = [
        ("REPOPROBE_GRAPHQL_URL", graphql_url.as_str()),
        ("REPOPROBE_RAW_URL", raw_url.as_str()),
        ("MOUNT_DIRECTORY", cache.to_str().unwrap()),
    ];

    let output = repoprobe(dir.path(), &["analyse", "octocat"], &env);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout.trim_end(),
        "/src/App.tsx file contains:\n  functions: useClock at line 2\n  components: App at line 1\n  hooks: useClock at line 2"
    );
    assert!(cache.join("octocat.entry").exists());
    assert!(cache.join("-octocat-web.entry").exists());
    assert!(cache.join("files/octocat/web/trunk/src/App.tsx.entry").exists());

    // Same answer with the host pointed somewhere unreachable: all from cache.
    let offline = [
        ("REPOPROBE_GRAPHQL_URL", "http://127.0.0.1:9/graphql"),
        ("REPOPROBE_RAW_URL", raw_url.as_str()),
        ("MOUNT_DIRECTORY", cache.to_str().unwrap()),
    ];
    let output = repoprobe(dir.path(), &["analyse", "octocat", "--json"], &offline);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["analysedRepo"], "octocat/web");
    assert_eq!(result["userStats"]["totalStarsReceived"], 6);
    assert_eq!(result["files"][0]["path"], "/src/App.tsx");
}
