//! Service context bundling the settings and all port trait objects.

use std::path::Path;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::http::LiveHttpTransport;
use crate::adapters::live::llm::LiveLlmClient;
use crate::adapters::recording::{RecordingClock, RecordingHttpTransport, RecordingLlmClient};
use crate::adapters::replaying::{ReplayingClock, ReplayingHttpTransport, ReplayingLlmClient};
use crate::cache::ResponseCache;
use crate::cassette::config::CassetteConfig;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Settings;
use crate::github::GithubClient;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::http::{GraphqlRequest, HttpTransport, TransportFuture};
use crate::ports::llm::{CompletionRequest, LlmClient, LlmFuture};

/// Everything one run needs: settings plus one implementation per port.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying). The cache filesystem is always real; tests point
/// `settings.cache_root` at a temporary directory.
pub struct ServiceContext {
    /// Resolved runtime settings.
    pub settings: Settings,
    /// Transport to the code host.
    pub http: Box<dyn HttpTransport>,
    /// Filesystem backing the response cache.
    pub fs: Box<dyn FileSystem>,
    /// Clock for rate-limit fallbacks.
    pub clock: Box<dyn Clock>,
    /// LLM client for downstream questions.
    pub llm: Box<dyn LlmClient>,
}

impl ServiceContext {
    /// Creates a live context talking to the real code host and LLM.
    #[must_use]
    pub fn live(settings: Settings) -> Self {
        let http = LiveHttpTransport::new(settings.github_token.clone());
        Self {
            settings,
            http: Box::new(http),
            fs: Box::new(LiveFileSystem),
            clock: Box::new(LiveClock),
            llm: Box::new(LiveLlmClient::new()),
        }
    }

    /// Creates a live context whose port traffic is captured by `session`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    #[must_use]
    pub fn recording(settings: Settings, session: &RecordingSession) -> Self {
        let live = Self::live(settings);
        Self {
            http: Box::new(RecordingHttpTransport::new(live.http, session.http.clone())),
            clock: Box::new(RecordingClock::new(live.clock, session.clock.clone())),
            llm: Box::new(RecordingLlmClient::new(live.llm, session.llm.clone())),
            ..live
        }
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Each port gets its own replayer over the same cassette so per-port
    /// cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(settings: Settings, path: &Path) -> Result<Self, String> {
        let cassette = CassetteConfig::load(path)?;
        Ok(Self {
            settings,
            http: Box::new(ReplayingHttpTransport::new(CassetteReplayer::new(&cassette))),
            fs: Box::new(LiveFileSystem),
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            llm: Box::new(ReplayingLlmClient::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette panic with a clear message when
    /// called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(settings: Settings, config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            settings,
            http: match replayers.http {
                Some(r) => Box::new(ReplayingHttpTransport::new(r)),
                None => Box::new(PanickingHttpTransport),
            },
            fs: Box::new(LiveFileSystem),
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            llm: match replayers.llm {
                Some(r) => Box::new(ReplayingLlmClient::new(r)),
                None => Box::new(PanickingLlmClient),
            },
        })
    }

    /// The response cache rooted at `settings.cache_root`.
    #[must_use]
    pub fn cache(&self) -> ResponseCache<'_> {
        ResponseCache::new(self.fs.as_ref(), &self.settings.cache_root)
    }

    /// Client for the code host's GraphQL and raw-content endpoints.
    #[must_use]
    pub fn github(&self) -> GithubClient<'_> {
        GithubClient::new(self)
    }
}

// --- Panicking adapters for ports without a cassette ---

struct PanickingHttpTransport;
impl HttpTransport for PanickingHttpTransport {
    fn post_graphql(&self, _request: &GraphqlRequest) -> TransportFuture<'_> {
        panic!("HttpTransport port not configured in CassetteConfig; no cassette loaded for http");
    }
    fn get(&self, _url: &str) -> TransportFuture<'_> {
        panic!("HttpTransport port not configured in CassetteConfig; no cassette loaded for http");
    }
}

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig; no cassette loaded for clock");
    }
}

struct PanickingLlmClient;
impl LlmClient for PanickingLlmClient {
    fn complete(&self, _request: &CompletionRequest) -> LlmFuture<'_> {
        panic!("LlmClient port not configured in CassetteConfig; no cassette loaded for llm");
    }
}
