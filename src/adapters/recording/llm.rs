//! Recording adapter for the `LlmClient` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CompletionRequest, LlmClient, LlmFuture};

/// Records questions and answers while delegating to an inner client.
pub struct RecordingLlmClient {
    inner: Box<dyn LlmClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingLlmClient {
    /// Wraps `inner`, appending every completion to `recorder`.
    pub fn new(inner: Box<dyn LlmClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// Input written for a completion. The summary turn is reduced to its size;
/// it is reproducible from the http cassette of the same run.
#[derive(Serialize)]
struct QuestionInput<'a> {
    model: &'a str,
    summary_bytes: usize,
    question: Option<&'a str>,
}

impl<'a> QuestionInput<'a> {
    fn of(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            summary_bytes: request.messages.first().map_or(0, |m| m.content.len()),
            question: request.messages.last().map(|m| m.content.as_str()),
        }
    }
}

impl LlmClient for RecordingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.complete(&request).await;
            record_result(&self.recorder, "llm", "complete", &QuestionInput::of(&request), &result);
            result
        })
    }
}
