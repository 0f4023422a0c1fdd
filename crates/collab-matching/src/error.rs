use collab_core::{CoreError, StoreError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("vector dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// The embedding provider could not produce a vector. The orchestrator
    /// recovers from this by scoring rule-only.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("brief {0} not found")]
    BriefNotFound(Uuid),

    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("persistence error: {0}")]
    Persistence(StoreError),
}

impl From<StoreError> for MatchingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound {
                entity: "brief",
                id,
            } => MatchingError::BriefNotFound(id),
            other => MatchingError::Persistence(other),
        }
    }
}
