//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the probe pipeline and an
//! external system (the code host over HTTP, the cache disk, time, the LLM).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod http;
pub mod llm;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use http::{GraphqlRequest, HttpReply, HttpTransport, TransportFuture};
pub use llm::{ChatMessage, CompletionRequest, CompletionResponse, LlmClient, LlmFuture};
