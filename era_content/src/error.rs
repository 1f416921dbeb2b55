//! Errors raised at the content-loading boundary.

use thiserror::Error;

/// Failures while turning raw documents into validated content.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The document is not valid JSON or does not match the raw shape.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field is absent or empty.
    #[error("{context}: missing required field `{field}`")]
    MissingField { context: String, field: &'static str },

    /// A bounded field holds a value outside its range.
    #[error("{context}: field `{field}` out of range ({value})")]
    OutOfRange {
        context: String,
        field: &'static str,
        value: f64,
    },

    /// There is nothing to start a session with.
    #[error("empty content set: {0}")]
    EmptyContentSet(String),
}

impl ContentError {
    pub fn missing(context: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            context: context.into(),
            field,
        }
    }

    pub fn out_of_range(context: impl Into<String>, field: &'static str, value: f64) -> Self {
        Self::OutOfRange {
            context: context.into(),
            field,
            value,
        }
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
