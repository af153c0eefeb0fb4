//! Replaying adapter for the `HttpTransport` port.

use std::sync::Mutex;

use super::{extract_result, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::http::{GraphqlRequest, HttpReply, HttpTransport, TransportFuture};

/// Serves recorded HTTP replies from a cassette.
pub struct ReplayingHttpTransport {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingHttpTransport {
    /// Creates a replaying transport backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl HttpTransport for ReplayingHttpTransport {
    fn post_graphql(&self, _request: &GraphqlRequest) -> TransportFuture<'_> {
        let output = next_output(&self.replayer, "http", "post_graphql");
        Box::pin(async move { extract_result::<HttpReply>(&output, "http::post_graphql") })
    }

    fn get(&self, _url: &str) -> TransportFuture<'_> {
        let output = next_output(&self.replayer, "http", "get");
        Box::pin(async move { extract_result::<HttpReply>(&output, "http::get") })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn serves_graphql_and_get_streams_independently() {
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            source: "local".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "http".into(),
                    method: "get".into(),
                    input: json!({"url": "a"}),
                    output: json!({"ok": {"status": 404, "body": "Not Found"}}),
                },
                Interaction {
                    seq: 1,
                    port: "http".into(),
                    method: "post_graphql".into(),
                    input: json!({}),
                    output: json!({"ok": {"status": 403, "rate_limit_reset": 1_700_000_000, "body": ""}}),
                },
            ],
        };
        let transport = ReplayingHttpTransport::new(CassetteReplayer::new(&cassette));

        let request = GraphqlRequest {
            url: "http://localhost/graphql".into(),
            query: "{ viewer { login } }".into(),
            variables: json!({}),
        };
        let reply = transport.post_graphql(&request).await.unwrap();
        assert_eq!(reply.status, 403);
        assert_eq!(reply.rate_limit_reset, Some(1_700_000_000));

        let reply = transport.get("a").await.unwrap();
        assert_eq!(reply, HttpReply::new(404, "Not Found"));
    }
}
