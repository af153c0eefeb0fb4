//! Records interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;

use super::format::{Cassette, CassetteSource, Interaction};

/// Collects port interactions for one run and writes them as YAML.
///
/// Raw downloads under the source's raw-content base are stored by their
/// `owner/repo/branch/path` remainder instead of the full address.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    source: CassetteSource,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// A recorder writing to `path` once [`finish`](Self::finish) is called.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        source: impl Into<CassetteSource>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            source: source.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Appends an interaction with the next sequence number.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        mut input: Value,
        output: Value,
    ) {
        let port = port.into();
        let method = method.into();
        if port == "http" && method == "get" {
            self.relativize_download(&mut input);
        }
        self.interactions.push(Interaction { seq: self.next_seq, port, method, input, output });
        self.next_seq += 1;
    }

    fn relativize_download(&self, input: &mut Value) {
        let Some(Value::String(url)) = input.get_mut("url") else { return };
        if let Some(rest) = self.source.relative_download(url).map(str::to_string) {
            *url = rest;
        }
    }

    /// Where the recorded traffic went.
    #[must_use]
    pub fn source(&self) -> &CassetteSource {
        &self.source
    }

    /// Number of interactions captured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing has been captured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Writes the cassette, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let count = self.interactions.len();
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            source: self.source,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        tracing::info!(cassette = %cassette.name, interactions = count, path = %self.path.display(), "cassette written");
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_and_finish() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("http.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "probe", "http://localhost/graphql");
        assert!(recorder.is_empty());
        recorder.record("http", "post_graphql", json!({"variables": {}}), json!({"ok": {}}));
        recorder.record("http", "get", json!({"url": "/a"}), json!({"ok": {}}));
        recorder.record("clock", "now", json!(null), json!("2024-01-01T00:00:00Z"));
        assert_eq!(recorder.len(), 3);

        let result_path = recorder.finish().expect("finish should succeed");
        assert_eq!(result_path, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();

        assert_eq!(cassette.name, "probe");
        assert_eq!(cassette.source.graphql_url, "http://localhost/graphql");
        assert!(cassette.source.cache_root.is_none());
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(cassette.interactions[1].input, json!({"url": "/a"}));
        assert_eq!(cassette.interactions[2].port, "clock");
    }

    #[test]
    fn downloads_are_stored_relative_to_the_raw_base() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("http.cassette.yaml");
        let source = CassetteSource {
            graphql_url: "http://host.test/graphql".into(),
            raw_url: Some("http://host.test/raw".into()),
            cache_root: Some(dir.path().join("cache")),
        };

        let mut recorder = CassetteRecorder::new(&path, "mirror", source.clone());
        recorder.record(
            "http",
            "get",
            json!({"url": "http://host.test/raw/octo/site/main/src/App.tsx"}),
            json!({"ok": {"status": 200, "body": ""}}),
        );
        recorder.record("http", "get", json!({"url": "http://other.test/a.ts"}), json!({"ok": {}}));
        recorder.record(
            "http",
            "post_graphql",
            json!({"url": "http://host.test/raw/x"}),
            json!({"ok": {}}),
        );
        assert_eq!(recorder.source(), &source);
        recorder.finish().unwrap();

        let cassette = crate::cassette::config::CassetteConfig::load(&path).unwrap();
        assert_eq!(cassette.source, source);
        assert_eq!(cassette.interactions[0].input, json!({"url": "octo/site/main/src/App.tsx"}));
        assert_eq!(cassette.interactions[1].input, json!({"url": "http://other.test/a.ts"}));
        assert_eq!(cassette.interactions[2].input, json!({"url": "http://host.test/raw/x"}));
    }
}
