use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read tuning file {path}: {source}")]
    TuningFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning file: {0}")]
    TuningFileParse(#[from] serde_yaml::Error),

    #[error("tuning validation failed: {0}")]
    Validation(String),
}

/// Errors surfaced by the storage traits in [`crate::store`].
///
/// Backends map their own error types onto these variants so the matching
/// and partnership crates never depend on a concrete database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A compare-and-swap write lost to a concurrent update.
    #[error("concurrent update conflict: {0}")]
    Conflict(String),

    #[error("creator {creator_id} has no remaining partnership capacity")]
    CapacityExceeded { creator_id: Uuid },

    #[error("storage backend error: {0}")]
    Backend(String),
}
