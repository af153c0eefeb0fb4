//! GraphQL documents sent to the code host.
//!
//! The shapes here are mirrored by the records in [`super::types`]; change
//! both together.

/// Profile, contribution stats and repository rankings for one user.
pub const USER_QUERY: &str = r"
query ($username: String!) {
  user(login: $username) {
    name
    twitterUsername
    username: login
    createdAt
    updatedAt
    location
    bio
    socialAccounts(first: 5) {
      nodes { displayName provider url }
      totalCount
    }
    isDeveloperProgramMember
    oneYearContributionsStats: contributionsCollection {
      startedAt
      endedAt
      restrictedContributionsCount
      totalIssueContributions
      totalCommitContributions
      totalPullRequestContributions
      totalPullRequestReviewContributions
      totalRepositoryContributions
      totalRepositoriesWithContributedIssues
      totalRepositoriesWithContributedCommits
      totalRepositoriesWithContributedPullRequests
      totalRepositoriesWithContributedPullRequestReviews
      popularIssueContribution {
        isRestricted
        issue { title createdAt closedAt url }
      }
      popularPullRequestContribution {
        isRestricted
        pullRequest { url title createdAt changedFiles reviewDecision }
      }
      hasAnyContributions
    }
    topRepositories(first: 50, orderBy: { direction: DESC, field: STARGAZERS }) {
      nodes { ...RepoDetails }
    }
    followers { totalCount }
    following { totalCount }
    starredRepositories { totalCount }
    recentlyContributedTo: repositoriesContributedTo(first: 10) {
      nodes { ...RepoDetails }
    }
    repositories(
      first: 100
      ownerAffiliations: [OWNER, ORGANIZATION_MEMBER, COLLABORATOR]
      orderBy: { direction: DESC, field: STARGAZERS }
    ) {
      totalCount
      nodes { url stargazerCount }
    }
    hasSponsorsListing
    totalSponsorshipAmountAsSponsorInCents
    sponsors { totalCount }
    sponsoring { totalCount }
  }
}

fragment RepoDetails on Repository {
  nameWithOwner
  stargazerCount
  forkCount
  primaryLanguage { name }
  languages(first: 5) {
    edges { size node { name } }
  }
}
";

/// Default branch plus the `HEAD:` tree, four directory levels deep.
pub const TREE_QUERY: &str = r#"
query ($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    defaultBranchRef { name }
    object(expression: "HEAD:") {
      ... on Tree {
        entries {
          name
          type
          object {
            ... on Tree {
              entries {
                name
                type
                object {
                  ... on Tree {
                    entries {
                      name
                      type
                      object {
                        ... on Tree {
                          entries { name type }
                        }
                      }
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;
