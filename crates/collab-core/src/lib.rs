//! Shared domain model for the creator/brand collaboration platform.
//!
//! Holds the entities the matching engine and the partnership lifecycle
//! operate on, the environment-driven application config, the YAML tuning
//! file, and the storage traits both subsystems are written against.

pub mod app_config;
pub mod briefs;
pub mod config;
pub mod creators;
pub mod error;
pub mod matches;
pub mod partnerships;
pub mod store;
pub mod tuning;

pub use app_config::{AppConfig, Environment};
pub use briefs::Brief;
pub use config::{load_app_config, load_app_config_from_env};
pub use creators::{CreatorProfile, DEFAULT_PARTNERSHIP_CAPACITY};
pub use error::{ConfigError, CoreError, StoreError};
pub use matches::{CreatorResponse, MatchReasons, MatchRecord, MatchResult, MatchTier};
pub use partnerships::{
    Deliverable, DeliverableType, NewPartnership, Partnership, PartnershipFilter,
    PartnershipStatus, RatingTarget,
};
pub use store::{
    CandidateFilter, MatchingStore, PartnershipStore, PartnershipVersion, RelayMetrics,
};
pub use tuning::{
    load_tuning, parse_tuning, HealthThresholds, ScoringConfig, TierThresholds, TuningConfig,
};
