//! GraphQL and raw-content access to the code host.
//!
//! A call makes exactly one round trip through the [`HttpTransport`] port and
//! never retries. Retry policy belongs to whoever invoked the run.
//!
//! [`HttpTransport`]: crate::ports::http::HttpTransport

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::context::ServiceContext;
use crate::ports::http::{GraphqlRequest, HttpReply};

/// Classified failure of a remote call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The host refused the call until `retry_after`.
    #[error("Too many requests. Rate limit exceeded. Try again after {}", retry_after.format("%Y-%m-%d %H:%M:%S UTC"))]
    RateLimited {
        /// When the quota resets.
        retry_after: DateTime<Utc>,
    },
    /// A named resource does not exist.
    #[error("{path} not found")]
    NotFound {
        /// First element of the error path, or the requested login.
        path: String,
    },
    /// The host answered with an unexpected status.
    #[error("{status} - Something went wrong")]
    Transport {
        /// HTTP status code.
        status: u16,
    },
    /// No HTTP status was obtained at all.
    #[error("code host unreachable: {0}")]
    Unreachable(String),
    /// The body did not have the expected shape.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
    /// The body reported errors with no special handling.
    #[error("code host reported errors: {0}")]
    Graphql(String),
}

impl RemoteError {
    /// HTTP-style status code reported to callers for this failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RateLimited { .. } => 429,
            Self::NotFound { .. } => 404,
            Self::Transport { status } => *status,
            Self::Unreachable(_) => 502,
            Self::MalformedBody(_) | Self::Graphql(_) => 500,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlBody {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    path: Vec<Value>,
    #[serde(default)]
    message: String,
}

/// Classifies one GraphQL reply, returning its `data` subtree on success.
///
/// A 403 is always a rate limit, checked before any other status. `now` is
/// only consulted when the reply carries no reset header.
///
/// # Errors
///
/// Returns the [`RemoteError`] matching the first rule that applies.
pub fn classify_reply(
    reply: &HttpReply,
    now: impl FnOnce() -> DateTime<Utc>,
) -> Result<Value, RemoteError> {
    if reply.status == 403 {
        return Err(rate_limited(reply, now));
    }
    if reply.status != 200 {
        return Err(RemoteError::Transport { status: reply.status });
    }

    let body: GraphqlBody = serde_json::from_str(&reply.body)
        .map_err(|e| RemoteError::MalformedBody(e.to_string()))?;

    if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
        if errors.iter().any(|e| e.kind.as_deref() == Some("RATE_LIMITED")) {
            return Err(rate_limited(reply, now));
        }
        let not_found = errors
            .iter()
            .filter(|e| e.kind.as_deref() == Some("NOT_FOUND"))
            .find_map(|e| e.path.first());
        if let Some(segment) = not_found {
            let path = match segment {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(RemoteError::NotFound { path });
        }
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        tracing::warn!(errors = ?messages, "code host reported errors");
        return Err(RemoteError::Graphql(messages.join("; ")));
    }

    body.data
        .filter(|data| !data.is_null())
        .ok_or_else(|| RemoteError::MalformedBody("response has no data".to_string()))
}

fn rate_limited(reply: &HttpReply, now: impl FnOnce() -> DateTime<Utc>) -> RemoteError {
    let retry_after = reply
        .rate_limit_reset
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .unwrap_or_else(|| now() + Duration::hours(1));
    RemoteError::RateLimited { retry_after }
}

/// Issues queries and raw-file downloads through the context's transport.
pub struct GithubClient<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GithubClient<'a> {
    /// Creates a client bound to `ctx`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Runs a GraphQL document and returns its classified `data` subtree.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] for every outcome other than success.
    pub async fn query(&self, document: &str, variables: Value) -> Result<Value, RemoteError> {
        let request = GraphqlRequest {
            url: self.ctx.settings.graphql_url.clone(),
            query: document.to_string(),
            variables,
        };
        let reply = self
            .ctx
            .http
            .post_graphql(&request)
            .await
            .map_err(|e| RemoteError::Unreachable(e.to_string()))?;
        classify_reply(&reply, || self.ctx.clock.now())
    }

    /// Like [`GithubClient::query`], decoding `data` into `T`.
    ///
    /// # Errors
    ///
    /// As [`GithubClient::query`], plus [`RemoteError::MalformedBody`] when
    /// a required field is missing.
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
    ) -> Result<T, RemoteError> {
        let data = self.query(document, variables).await?;
        serde_json::from_value(data).map_err(|e| RemoteError::MalformedBody(e.to_string()))
    }

    /// Downloads one file's text from the raw-content endpoint.
    ///
    /// Returns `None` on any non-200 reply or transport failure; a missing
    /// file is an expected outcome in a large tree.
    pub async fn download_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Option<String> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let url = format!("{}/{owner}/{repo}/{branch}/{path}", self.ctx.settings.raw_url);

        match self.ctx.http.get(&url).await {
            Ok(reply) if reply.status == 200 => Some(reply.body),
            Ok(reply) => {
                tracing::warn!(%url, status = reply.status, "file unavailable");
                None
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "file download failed");
                None
            }
        }
    }
}
