//! Creator/brief matching engine.
//!
//! Scores seeking creators against a brand brief with a weighted rule score
//! blended with embedding similarity, then persists the ranked run.

pub mod availability;
pub mod embeddings;
pub mod error;
pub mod pipeline;
mod retry;
pub mod scorer;
pub mod similarity;
pub mod types;

pub use availability::{check_availability, Availability, AvailabilityConstraints, UnmetReason};
pub use embeddings::{Embedder, TeiClient};
pub use error::MatchingError;
pub use pipeline::match_brief_to_creators;
pub use scorer::{
    hybrid_score, is_dream_brand, rule_score, score_match, semantic_score, MatchInput, RuleScore,
};
pub use similarity::cosine_similarity;
pub use types::{MatchOptions, MatchRun, MatchingConfig};
