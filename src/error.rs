// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the authoring editor.
//!
//! Every orchestrator operation fails with an [`EditorError`] whose
//! [`ErrorKind`] a presentation layer can branch on.

use thiserror::Error;

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Another mutating operation is in flight
    Concurrency,
    /// Session precondition violated
    State,
    /// Content field failed a rule
    Validation,
    /// No active session or user at publish time
    Auth,
    /// Backend round trip failed
    Remote,
    /// Dependent creation partially succeeded
    DependentEntity,
    /// Media could not be decoded
    Media,
}

/// Failure of a backend round trip
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The backend (or simulator) reported a failure
    #[error("{operation} failed: {message}")]
    Failed { operation: String, message: String },

    /// The backend answered but with `success = false`
    #[error("{operation} was rejected: {message}")]
    Rejected { operation: String, message: String },

    /// No answer within the configured timeout
    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    /// Transport-level failure (connection, status, body)
    #[error("{operation} transport error: {message}")]
    Transport { operation: String, message: String },
}

impl RemoteError {
    /// Name of the operation that failed
    pub fn operation(&self) -> &str {
        match self {
            RemoteError::Failed { operation, .. }
            | RemoteError::Rejected { operation, .. }
            | RemoteError::Timeout { operation, .. }
            | RemoteError::Transport { operation, .. } => operation,
        }
    }
}

/// Failure to probe a media blob
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    #[error("media blob is empty")]
    Empty,

    #[error("unsupported media: {0}")]
    Unsupported(String),

    #[error("decoding did not complete: {0}")]
    Decode(String),

    #[error("decoder task failed: {0}")]
    Task(String),
}

/// Editor operation failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("another editor operation is already in progress")]
    Concurrency,

    #[error("{0}")]
    State(String),

    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    Auth(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("song {song_id} was created but its note sequence was not: {message}")]
    DependentEntity { song_id: String, message: String },

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl EditorError {
    /// Build a state error
    pub fn state(message: impl Into<String>) -> Self {
        EditorError::State(message.into())
    }

    /// Build a validation error carrying a single message
    pub fn invalid(message: impl Into<String>) -> Self {
        EditorError::Validation(vec![message.into()])
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditorError::Concurrency => ErrorKind::Concurrency,
            EditorError::State(_) => ErrorKind::State,
            EditorError::Validation(_) => ErrorKind::Validation,
            EditorError::Auth(_) => ErrorKind::Auth,
            EditorError::Remote(_) => ErrorKind::Remote,
            EditorError::DependentEntity { .. } => ErrorKind::DependentEntity,
            EditorError::Media(_) => ErrorKind::Media,
        }
    }

    /// Validation messages, if this is a validation failure
    pub fn messages(&self) -> &[String] {
        match self {
            EditorError::Validation(messages) => messages,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(EditorError::Concurrency.kind(), ErrorKind::Concurrency);
        assert_eq!(EditorError::state("x").kind(), ErrorKind::State);
        assert_eq!(EditorError::invalid("x").kind(), ErrorKind::Validation);
        assert_eq!(EditorError::from(MediaError::Empty).kind(), ErrorKind::Media);
    }

    #[test]
    fn test_validation_display_joins_messages() {
        let err = EditorError::Validation(vec!["audio is required".into(), "title is required".into()]);
        assert_eq!(
            err.to_string(),
            "validation failed: audio is required; title is required"
        );
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_remote_error_carries_operation() {
        let err = RemoteError::Timeout {
            operation: "save".into(),
            after_ms: 250,
        };
        assert_eq!(err.operation(), "save");
        assert_eq!(EditorError::from(err.clone()).kind(), ErrorKind::Remote);
        assert_eq!(err.to_string(), "save timed out after 250ms");
    }
}
