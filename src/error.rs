//! Error types for the similarity core and the service around it

use thiserror::Error;

/// Failures of the pure similarity core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Failures surfaced by the engine and the HTTP layer
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Similarity(#[from] SimilarityError),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
