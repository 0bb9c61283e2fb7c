//! Error types for cardmatch-core.

use thiserror::Error;

/// Result type alias using ContentError.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised while validating a screen's content table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("content table for screen {screen} is empty")]
    EmptyTable { screen: String },

    #[error("duplicate prompt key {key} in screen {screen}")]
    DuplicatePrompt { screen: String, key: String },

    #[error("duplicate answer token {token} in screen {screen}")]
    DuplicateAnswer { screen: String, token: String },

    #[error("fixed prompt {key} is not part of screen {screen}")]
    UnknownFixedPrompt { screen: String, key: String },

    #[error("duplicate {side} token {token} in screen {screen}")]
    DuplicatePairToken {
        screen: String,
        side: &'static str,
        token: String,
    },
}

/// Errors reported by an audio backend.
///
/// These never leave the cue controller; they are logged and the game
/// carries on without sound.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("cue not found: {0}")]
    NotFound(String),

    #[error("failed to load cue {cue}: {reason}")]
    Load { cue: String, reason: String },
}
