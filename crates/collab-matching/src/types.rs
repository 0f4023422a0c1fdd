use std::time::Duration;

use collab_core::{AppConfig, MatchRecord, ScoringConfig};

/// Default for [`MatchOptions::min_score`]. Low matches are kept on purpose
/// while the scorer is being calibrated.
pub const DEFAULT_MIN_SCORE: u8 = 0;
/// Default for [`MatchOptions::max_matches`].
pub const DEFAULT_MAX_MATCHES: usize = 50;
/// Default deadline for acquiring a brief embedding.
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-run knobs supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub min_score: u8,
    pub max_matches: usize,
    pub use_semantic_matching: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_matches: DEFAULT_MAX_MATCHES,
            use_semantic_matching: true,
        }
    }
}

impl MatchOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            min_score: config.match_min_score,
            max_matches: config.match_max_matches,
            use_semantic_matching: true,
        }
    }
}

/// Engine-wide settings that stay fixed across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    pub scoring: ScoringConfig,
    /// Overall deadline for the embedding call, retries included.
    pub embed_timeout: Duration,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            embed_timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }
}

impl MatchingConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig, scoring: ScoringConfig) -> Self {
        Self {
            scoring,
            embed_timeout: Duration::from_millis(config.embed_timeout_ms),
        }
    }
}

/// Outcome of one matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRun {
    /// Persisted matches, best first.
    pub matches: Vec<MatchRecord>,
    /// Creators returned by the store's pre-filter.
    pub candidates: usize,
    /// Candidates dropped by the detailed availability check.
    pub unavailable: usize,
    /// Whether a brief embedding was available for semantic scoring.
    pub semantic_enabled: bool,
}
