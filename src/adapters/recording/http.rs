//! Recording adapter for the `HttpTransport` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::http::{GraphqlRequest, HttpTransport, TransportFuture};

/// Records HTTP round trips while delegating to an inner transport.
pub struct RecordingHttpTransport {
    inner: Box<dyn HttpTransport>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHttpTransport {
    /// Creates a new recording transport wrapping the given implementation.
    pub fn new(inner: Box<dyn HttpTransport>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// What gets written as the input of a GraphQL interaction. The document
/// text is left out: it is a constant of the binary, not of the run.
#[derive(Serialize)]
struct GraphqlInput<'a> {
    url: &'a str,
    variables: &'a serde_json::Value,
}

#[derive(Serialize)]
struct UrlInput<'a> {
    url: &'a str,
}

impl HttpTransport for RecordingHttpTransport {
    fn post_graphql(&self, request: &GraphqlRequest) -> TransportFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.post_graphql(&request).await;
            let input = GraphqlInput { url: &request.url, variables: &request.variables };
            record_result(&self.recorder, "http", "post_graphql", &input, &result);
            result
        })
    }

    fn get(&self, url: &str) -> TransportFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let result = self.inner.get(&url).await;
            record_result(&self.recorder, "http", "get", &UrlInput { url: &url }, &result);
            result
        })
    }
}
