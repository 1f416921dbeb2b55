//! Engine error taxonomy.

use era_content::ContentError;
use thiserror::Error;

/// Everything that can go wrong while walking a content graph.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The selection is not one of the presented options. Recoverable:
    /// re-prompt the same node at the same depth.
    #[error("invalid selection: {reason} (expected one of {option_count} options)")]
    InvalidSelection { reason: String, option_count: usize },

    /// Content needed to resolve a node is absent. Fatal to the node's
    /// branch, not to the session.
    #[error("missing content: {0}")]
    MissingContent(String),

    /// Nothing to start a session with.
    #[error("empty content set: {0}")]
    EmptyContentSet(String),

    /// The player walked away mid-prompt.
    #[error("session cancelled by the player")]
    Cancelled,

    /// Invalid session configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl EngineError {
    /// Whether the current prompt should simply be re-issued.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InvalidSelection { .. })
    }
}

impl From<ContentError> for EngineError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::EmptyContentSet(what) => EngineError::EmptyContentSet(what),
            other => EngineError::MissingContent(other.to_string()),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
