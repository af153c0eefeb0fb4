//! Typed records for the parts of the code host's responses we consume,
//! and the formatted profile we hand back to callers.
//!
//! Raw shapes mirror [`super::queries`]. Any required field missing from a
//! response fails deserialization, which the client reports as a malformed
//! body instead of letting the gap surface later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `{ totalCount }` connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Count {
    /// Number of items in the connection.
    pub total_count: u64,
}

/// `{ nodes }` connection whose entries may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    /// Entries; null ones are kept so callers can skip them.
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
}

/// `{ name }` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    /// The name.
    pub name: String,
}

/// A linked social account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    /// Label shown on the profile.
    pub display_name: String,
    /// Provider enum value (e.g. `TWITTER`).
    pub provider: String,
    /// Account URL.
    pub url: String,
}

/// The user's most notable issue in the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularIssueContribution {
    /// Whether details are hidden.
    pub is_restricted: bool,
    /// Issue details, absent when restricted.
    pub issue: Option<IssueRef>,
}

/// Minimal issue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRef {
    /// Issue title.
    pub title: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Close time, if closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Issue URL.
    pub url: String,
}

/// The user's most notable pull request in the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularPullRequestContribution {
    /// Whether details are hidden.
    pub is_restricted: bool,
    /// Pull request details, absent when restricted.
    pub pull_request: Option<PullRequestRef>,
}

/// Minimal pull request record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRef {
    /// Pull request URL.
    pub url: String,
    /// Title.
    pub title: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Number of files touched.
    pub changed_files: u64,
    /// Review state, if any.
    pub review_decision: Option<String>,
}

/// Contribution counters for the one-year window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionTotals {
    /// Contributions to private repositories, counted but not detailed.
    pub restricted_contributions_count: u64,
    /// Issues opened.
    pub total_issue_contributions: u64,
    /// Commits authored.
    pub total_commit_contributions: u64,
    /// Pull requests opened.
    pub total_pull_request_contributions: u64,
    /// Pull request reviews submitted.
    pub total_pull_request_review_contributions: u64,
    /// Repositories created.
    pub total_repository_contributions: u64,
    /// Distinct repositories with opened issues.
    pub total_repositories_with_contributed_issues: u64,
    /// Distinct repositories with commits.
    pub total_repositories_with_contributed_commits: u64,
    /// Distinct repositories with opened pull requests.
    pub total_repositories_with_contributed_pull_requests: u64,
    /// Distinct repositories with reviews.
    pub total_repositories_with_contributed_pull_request_reviews: u64,
    /// Most notable issue, if any.
    pub popular_issue_contribution: Option<PopularIssueContribution>,
    /// Most notable pull request, if any.
    pub popular_pull_request_contribution: Option<PopularPullRequestContribution>,
    /// Whether the window holds any contribution at all.
    pub has_any_contributions: bool,
}

/// Bounds of the contribution window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    /// Window start.
    pub started_at: DateTime<Utc>,
    /// Window end.
    pub ended_at: DateTime<Utc>,
}

/// Formatted contribution stats: the counters plus a `timePeriod` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionStats {
    /// Counters.
    #[serde(flatten)]
    pub totals: ContributionTotals,
    /// Window the counters cover.
    pub time_period: TimePeriod,
}

/// Contribution stats as the API returns them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContributions {
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    #[serde(flatten)]
    totals: ContributionTotals,
}

impl From<RawContributions> for ContributionStats {
    fn from(raw: RawContributions) -> Self {
        Self {
            totals: raw.totals,
            time_period: TimePeriod { started_at: raw.started_at, ended_at: raw.ended_at },
        }
    }
}

/// One language and its byte count in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageShare {
    /// Language name as reported by the host (e.g. `TypeScript`).
    pub name: String,
    /// Bytes of code in that language.
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct LanguageEdge {
    size: u64,
    node: Named,
}

#[derive(Debug, Clone, Deserialize)]
struct LanguageEdges {
    #[serde(default)]
    edges: Vec<Option<LanguageEdge>>,
}

/// Repository fragment as the API returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepository {
    name_with_owner: String,
    stargazer_count: u64,
    fork_count: u64,
    primary_language: Option<Named>,
    languages: Option<LanguageEdges>,
}

/// Formatted repository summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSummary {
    /// `owner/name`.
    pub name_with_owner: String,
    /// Stars.
    pub stargazer_count: u64,
    /// Forks.
    pub fork_count: u64,
    /// Entry of `languages` matching the primary language, if listed there.
    pub primary_language: Option<LanguageShare>,
    /// Language breakdown, largest first.
    pub languages: Vec<LanguageShare>,
}

impl RepoSummary {
    /// Splits `name_with_owner` into `(owner, name)`.
    #[must_use]
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.name_with_owner.split_once('/')?;
        (!owner.is_empty() && !name.is_empty()).then_some((owner, name))
    }
}

impl From<RawRepository> for RepoSummary {
    fn from(raw: RawRepository) -> Self {
        let primary = raw.primary_language.map(|l| l.name);
        let languages: Vec<LanguageShare> = raw
            .languages
            .map(|l| l.edges)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|edge| LanguageShare { name: edge.node.name, size: edge.size })
            .collect();
        let primary_language = primary
            .and_then(|name| languages.iter().find(|lang| lang.name == name).cloned());

        Self {
            name_with_owner: raw.name_with_owner,
            stargazer_count: raw.stargazer_count,
            fork_count: raw.fork_count,
            primary_language,
            languages,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StarCount {
    stargazer_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnedRepositories {
    total_count: u64,
    #[serde(default)]
    nodes: Vec<Option<StarCount>>,
}

/// `data` of the user query.
#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    /// Null when the login does not exist.
    pub user: Option<RawUser>,
}

/// User object as the API returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    name: Option<String>,
    twitter_username: Option<String>,
    username: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    location: Option<String>,
    bio: Option<String>,
    social_accounts: Nodes<SocialAccount>,
    is_developer_program_member: bool,
    one_year_contributions_stats: RawContributions,
    top_repositories: Nodes<RawRepository>,
    followers: Count,
    following: Count,
    starred_repositories: Count,
    recently_contributed_to: Nodes<RawRepository>,
    repositories: OwnedRepositories,
    has_sponsors_listing: bool,
    total_sponsorship_amount_as_sponsor_in_cents: Option<u64>,
    sponsors: Count,
    sponsoring: Count,
}

/// Public profile summary returned to callers and cached under `<username>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Profile bio.
    pub bio: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Login.
    pub username: String,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
    /// Last profile update.
    pub updated_at: DateTime<Utc>,
    /// Free-text location.
    pub location: Option<String>,
    /// Linked Twitter handle.
    pub twitter_username: Option<String>,
    /// Other linked accounts.
    pub social_accounts: Vec<SocialAccount>,
    /// Member of the developer program.
    pub is_developer_program_member: bool,
    /// Owned repositories.
    pub total_repositories: u64,
    /// Follower count.
    pub followers: u64,
    /// Following count.
    pub following: u64,
    /// Whether the user can be sponsored.
    pub has_sponsors_listing: bool,
    /// Sponsors of the user.
    pub total_sponsors: u64,
    /// Amount the user has given as a sponsor, when visible.
    pub total_sponsorship_amount_as_sponsor_in_cents: Option<u64>,
    /// Accounts the user sponsors.
    pub total_sponsorings: u64,
    /// Activity over the last year.
    pub one_year_contributions_stats: ContributionStats,
    /// Repositories the user starred.
    pub total_starred_repositories: u64,
    /// Sum of stars over the (up to 100) most-starred owned repositories.
    pub total_stars_received: u64,
    /// Ranked by stars; order is preserved from the API.
    pub top_repositories: Vec<RepoSummary>,
    /// Repositories recently contributed to, null nodes skipped.
    pub recently_contributed_repositories: Vec<RepoSummary>,
}

fn summaries(nodes: Nodes<RawRepository>) -> Vec<RepoSummary> {
    nodes.nodes.into_iter().flatten().map(RepoSummary::from).collect()
}

impl From<RawUser> for UserProfile {
    fn from(raw: RawUser) -> Self {
        let total_stars_received =
            raw.repositories.nodes.iter().flatten().map(|repo| repo.stargazer_count).sum();

        Self {
            bio: raw.bio,
            name: raw.name,
            username: raw.username,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            location: raw.location,
            twitter_username: raw.twitter_username,
            social_accounts: raw.social_accounts.nodes.into_iter().flatten().collect(),
            is_developer_program_member: raw.is_developer_program_member,
            total_repositories: raw.repositories.total_count,
            followers: raw.followers.total_count,
            following: raw.following.total_count,
            has_sponsors_listing: raw.has_sponsors_listing,
            total_sponsors: raw.sponsors.total_count,
            total_sponsorship_amount_as_sponsor_in_cents: raw
                .total_sponsorship_amount_as_sponsor_in_cents,
            total_sponsorings: raw.sponsoring.total_count,
            one_year_contributions_stats: raw.one_year_contributions_stats.into(),
            total_starred_repositories: raw.starred_repositories.total_count,
            total_stars_received,
            top_repositories: summaries(raw.top_repositories),
            recently_contributed_repositories: summaries(raw.recently_contributed_to),
        }
    }
}

/// `data` of the tree query.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeData {
    /// Null when the repository does not exist or is not visible.
    pub repository: Option<RawRepositoryTree>,
}

/// Repository node of the tree query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepositoryTree {
    /// Default branch, absent for empty repositories.
    pub default_branch_ref: Option<Named>,
    /// Root tree at `HEAD:`.
    pub object: Option<RawTree>,
}

/// A directory listing. Blob objects deserialize to an empty listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTree {
    /// Entries in host order.
    #[serde(default)]
    pub entries: Vec<Option<RawTreeEntry>>,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTreeEntry {
    /// Base name.
    #[serde(default)]
    pub name: String,
    /// `blob`, `tree`, `commit`, or absent.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Nested listing for trees within the query depth.
    #[serde(default)]
    pub object: Option<RawTree>,
}
