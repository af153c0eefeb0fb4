//! Cassette data structures for recording and replaying interactions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`"http"`, `"clock"` or `"llm"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Endpoints and cache the traffic was captured against.
    pub source: CassetteSource,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

/// Where a recorded run pointed.
///
/// The raw-content base lets the recorder store downloads relative to it,
/// so a cassette recorded against one mirror replays the same against
/// another. The cache root is kept for reference: a run that found its
/// files in the cache recorded no traffic for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CassetteSource {
    /// GraphQL endpoint.
    pub graphql_url: String,
    /// Raw-content base address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_url: Option<String>,
    /// Response cache root in effect while recording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_root: Option<PathBuf>,
}

impl CassetteSource {
    /// `url` relative to the raw-content base, when it lies under it.
    #[must_use]
    pub fn relative_download<'a>(&self, url: &'a str) -> Option<&'a str> {
        let base = self.raw_url.as_deref()?;
        url.strip_prefix(base)?.strip_prefix('/')
    }
}

impl From<&str> for CassetteSource {
    fn from(graphql_url: &str) -> Self {
        Self { graphql_url: graphql_url.to_string(), ..Self::default() }
    }
}

impl From<&Settings> for CassetteSource {
    fn from(settings: &Settings) -> Self {
        Self {
            graphql_url: settings.graphql_url.clone(),
            raw_url: Some(settings.raw_url.clone()),
            cache_root: Some(settings.cache_root.clone()),
        }
    }
}
