use collab_core::{CoreError, PartnershipStatus, StoreError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PartnershipError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: PartnershipStatus,
        to: PartnershipStatus,
    },

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("deliverable {deliverable_id} not found on partnership {partnership_id}")]
    DeliverableNotFound {
        partnership_id: Uuid,
        deliverable_id: Uuid,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("creator {creator_id} has no remaining partnership capacity")]
    CapacityExceeded { creator_id: Uuid },

    /// The partnership changed between read and write. Safe to retry.
    #[error("concurrent update conflict: {0}")]
    Conflict(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<StoreError> for PartnershipError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => PartnershipError::NotFound { entity, id },
            StoreError::Conflict(msg) => PartnershipError::Conflict(msg),
            StoreError::CapacityExceeded { creator_id } => {
                PartnershipError::CapacityExceeded { creator_id }
            }
            StoreError::Backend(msg) => PartnershipError::Persistence(msg),
        }
    }
}

impl From<CoreError> for PartnershipError {
    fn from(err: CoreError) -> Self {
        PartnershipError::Validation(err.to_string())
    }
}
