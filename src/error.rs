//! Error types for result projection

use arrow::error::ArrowError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResultError>;

#[derive(Error, Debug)]
pub enum ResultError {
    #[error("Relation not found: {0}")]
    RelationNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MessagePack error: {0}")]
    MsgPack(#[from] rmp_serde::decode::Error),

    /// Failure reported by the fetch collaborator, passed through untouched.
    #[error(transparent)]
    Fetch(#[from] anyhow::Error),
}

impl ResultError {
    /// Get a stable error code for callers that branch on error kind
    pub fn code(&self) -> &'static str {
        match self {
            ResultError::RelationNotFound(_) => "RELATION_NOT_FOUND",
            ResultError::InvalidFormat(_)
            | ResultError::Arrow(_)
            | ResultError::Json(_)
            | ResultError::MsgPack(_) => "INVALID_FORMAT",
            ResultError::Fetch(_) => "FETCH_FAILED",
            ResultError::Io(_) => "INTERNAL_ERROR",
        }
    }
}
