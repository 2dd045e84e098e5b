//! # Error Types
//!
//! This module defines error types used throughout the vitrine library.
//!
//! Only the content-store client and the outer surfaces (config loading, the
//! HTTP server) ever return these. The slot resolver swallows them at its
//! boundary, so page rendering never sees a `VitrineError`.

use thiserror::Error;

/// Main error type for vitrine operations
#[derive(Debug, Error)]
pub enum VitrineError {
    /// Content store unreachable, timed out, or answered with a failure status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Content store answered with a body we could not interpret
    #[error("Decode error: {0}")]
    Decode(String),

    /// Missing or malformed configuration input
    #[error("Config error: {0}")]
    Config(String),

    /// The host environment refused an action (clipboard write, opening a window)
    #[error("Host error: {0}")]
    Host(String),

    /// HTTP server bind/serve failure
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for VitrineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            VitrineError::Decode(e.to_string())
        } else {
            VitrineError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for VitrineError {
    fn from(e: serde_json::Error) -> Self {
        VitrineError::Decode(e.to_string())
    }
}
