//! Cassettes: recorded port traffic that can be replayed offline.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
