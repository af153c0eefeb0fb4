//! Questions about a probed repository, answered by the language model.

use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::context::ServiceContext;
use crate::ports::llm::{ChatMessage, CompletionRequest};

/// Frames the conversation: a summary arrives first, the question second.
pub const SYSTEM_INSTRUCTION: &str = "You are a very talented developer. You will be given \
extracted details of the files in one of a user's repositories (components, functions, \
comments and so on) in a fixed plain-text format. Learn everything you can from it. The user \
sends the repository details first and a question about them in the next message. Always answer \
with a brief summary, and if nothing can be found or deduced reply with \
'sorry, insufficient information!'";

/// Acknowledgement placed between the summary and the question.
pub const ACKNOWLEDGEMENT: &str = "Ok! What's the question?";

const MAX_TOKENS: u32 = 1024;

/// The model's answer and its token usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Trimmed answer text.
    pub message: String,
    /// Prompt tokens consumed.
    pub prompt_tokens: u32,
    /// Tokens generated.
    pub completion_tokens: u32,
}

/// Builds the completion request for `question` about `summary`.
#[must_use]
pub fn build_request(model: &str, summary: &str, question: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        system: SYSTEM_INSTRUCTION.to_string(),
        messages: vec![
            ChatMessage::user(summary),
            ChatMessage::assistant(ACKNOWLEDGEMENT),
            ChatMessage::user(question),
        ],
        max_tokens: MAX_TOKENS,
    }
}

/// Asks `question` with `summary` as context.
///
/// # Errors
///
/// Returns [`AnalysisError::Llm`] if the model call fails.
pub async fn ask(
    ctx: &ServiceContext,
    summary: &str,
    question: &str,
) -> Result<Answer, AnalysisError> {
    let request = build_request(&ctx.settings.llm_model, summary, question);
    let response =
        ctx.llm.complete(&request).await.map_err(|e| AnalysisError::Llm(e.to_string()))?;
    tracing::info!(
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "question answered"
    );
    Ok(Answer {
        message: response.text.trim().to_string(),
        prompt_tokens: response.prompt_tokens,
        completion_tokens: response.completion_tokens,
    })
}
