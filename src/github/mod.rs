//! Code-host access: GraphQL queries, raw file downloads and the typed
//! subset of the responses this crate consumes.

pub mod client;
pub mod queries;
pub mod types;

pub use client::{classify_reply, GithubClient, RemoteError};
