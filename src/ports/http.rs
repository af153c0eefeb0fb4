//! HTTP transport port for talking to the code host.
//!
//! The transport only moves bytes. Deciding what a reply *means* (rate
//! limited, not found, malformed) is done by `github::client`, so the
//! classification rules can be exercised against recorded replies.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`HttpTransport`] to keep the trait dyn-compatible.
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpReply, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// A GraphQL POST to the code host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphqlRequest {
    /// Endpoint URL.
    pub url: String,
    /// GraphQL document text.
    pub query: String,
    /// Variables bound into the document.
    pub variables: serde_json::Value,
}

/// The raw outcome of one HTTP round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `X-RateLimit-Reset` header (unix seconds), when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset: Option<i64>,
    /// Response body as text.
    pub body: String,
}

impl HttpReply {
    /// Convenience constructor for a reply without rate-limit headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, rate_limit_reset: None, body: body.into() }
    }
}

/// Performs single HTTP round trips against the code host. No retries.
pub trait HttpTransport: Send + Sync {
    /// POSTs a GraphQL document with its variables.
    ///
    /// # Errors
    ///
    /// Returns an error only when no HTTP status was obtained (DNS, connect,
    /// TLS, body read). Non-2xx statuses are successful round trips.
    fn post_graphql(&self, request: &GraphqlRequest) -> TransportFuture<'_>;

    /// GETs a URL, typically a raw file address.
    ///
    /// # Errors
    ///
    /// Same contract as [`HttpTransport::post_graphql`].
    fn get(&self, url: &str) -> TransportFuture<'_>;
}
