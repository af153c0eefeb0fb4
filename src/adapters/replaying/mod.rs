//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod http;
pub mod llm;

pub use clock::ReplayingClock;
pub use http::ReplayingHttpTransport;
pub use llm::ReplayingLlmClient;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;

/// Pops the next recorded output for `port::method`.
///
/// # Panics
///
/// Panics when the cassette has nothing left for this pair (see
/// [`CassetteReplayer::next_interaction`]).
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = match replayer.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard.next_interaction(port, method).output.clone()
}

/// Extracts a Result from a cassette output JSON value.
///
/// Expects `{"ok": <value>}` or `{"err": "message"}`.
pub(crate) fn extract_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
