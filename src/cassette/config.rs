//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a cassette path panic if
/// called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the HTTP transport cassette file.
    pub http: Option<PathBuf>,
    /// Path to the clock cassette file.
    pub clock: Option<PathBuf>,
    /// Path to the LLM cassette file.
    pub llm: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the HTTP transport.
    pub http: Option<CassetteReplayer>,
    /// Replayer for the clock.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the LLM.
    pub llm: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Reads every `<port>.cassette.yaml` present in `dir`, as written by a
    /// recording session.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let pick = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self { http: pick("http"), clock: pick("clock"), llm: pick("llm") }
    }

    /// Load one cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Cassette, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let replayer = |path: &Option<PathBuf>| -> Result<Option<CassetteReplayer>, String> {
            path.as_deref().map(|p| Self::load(p).map(|c| CassetteReplayer::new(&c))).transpose()
        };
        Ok(PortReplayers {
            http: replayer(&self.http)?,
            clock: replayer(&self.clock)?,
            llm: replayer(&self.llm)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn from_session_dir_picks_only_existing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut rec =
            CassetteRecorder::new(dir.path().join("http.cassette.yaml"), "s-http", "local");
        rec.record("http", "get", json!({"url": "x"}), json!({"ok": {"status": 404, "body": ""}}));
        rec.finish().unwrap();

        let config = CassetteConfig::from_session_dir(dir.path());
        assert!(config.http.is_some());
        assert!(config.clock.is_none());
        assert!(config.llm.is_none());

        let mut replayers = config.load_all().unwrap();
        let http = replayers.http.as_mut().unwrap();
        assert_eq!(http.next_interaction("http", "get").output["ok"]["status"], json!(404));
        assert!(replayers.llm.is_none());
    }

    #[test]
    fn load_reports_unparseable_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.cassette.yaml");
        std::fs::write(&path, "interactions: [").unwrap();

        let err = CassetteConfig::load(&path).unwrap_err();
        assert!(err.contains("Failed to parse cassette file"));
    }

    #[test]
    fn load_all_with_no_cassettes() {
        let replayers = CassetteConfig::default().load_all().unwrap();
        assert!(replayers.http.is_none());
        assert!(replayers.clock.is_none());
        assert!(replayers.llm.is_none());
    }
}
