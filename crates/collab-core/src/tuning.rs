//! Product-tuned scoring and health constants.
//!
//! Every value has a documented default, so an absent tuning file (or an
//! absent key inside one) behaves exactly like the shipped calibration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Weights, tolerances and windows used by the match scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Share of the hybrid score taken from the semantic score.
    pub semantic_weight: f64,
    /// Share of the hybrid score taken from the rule score.
    pub rule_weight: f64,
    /// Multiplier applied to the hybrid score on a dream-brand match.
    pub dream_brand_boost: f64,
    /// Fractional widening of the follower band for half credit (0.2 = 20%).
    pub follower_tolerance: f64,
    /// Fraction of the minimum engagement rate that still earns partial credit.
    pub engagement_tolerance: f64,
    /// Cosine similarity mapped to a semantic score of 0.
    pub semantic_floor: f64,
    /// Cosine similarity mapped to a semantic score of 100.
    pub semantic_ceiling: f64,
    /// Semantic scores strictly above this set the `semantic_match` reason.
    pub semantic_match_threshold: u8,
    pub tiers: TierThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.6,
            rule_weight: 0.4,
            dream_brand_boost: 1.5,
            follower_tolerance: 0.2,
            engagement_tolerance: 0.8,
            semantic_floor: 0.5,
            semantic_ceiling: 1.0,
            semantic_match_threshold: 50,
            tiers: TierThresholds::default(),
        }
    }
}

/// Minimum hybrid scores for each display tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierThresholds {
    pub golden: u8,
    pub great: u8,
    pub good: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            golden: 85,
            great: 70,
            good: 50,
        }
    }
}

/// Limits used by the partnership health evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthThresholds {
    pub negotiation_stall_days: i64,
    pub execution_stall_days: i64,
    pub execution_min_progress: u8,
    pub review_stall_days: i64,
    pub communication_floor: u8,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            negotiation_stall_days: 7,
            execution_stall_days: 30,
            execution_min_progress: 50,
            review_stall_days: 5,
            communication_floor: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningConfig {
    pub matching: ScoringConfig,
    pub health: HealthThresholds,
}

/// Load and validate a tuning file from disk.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_tuning(path: &Path) -> Result<TuningConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TuningFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_tuning(&content)
}

/// Parse and validate tuning YAML held in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_tuning(content: &str) -> Result<TuningConfig, ConfigError> {
    let tuning: TuningConfig = serde_yaml::from_str(content)?;
    validate_tuning(&tuning)?;
    Ok(tuning)
}

fn validate_tuning(tuning: &TuningConfig) -> Result<(), ConfigError> {
    let m = &tuning.matching;

    for (name, value) in [
        ("semantic_weight", m.semantic_weight),
        ("rule_weight", m.rule_weight),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "matching.{name} must be within [0, 1], got {value}"
            )));
        }
    }

    if ((m.semantic_weight + m.rule_weight) - 1.0).abs() > 1e-6 {
        return Err(ConfigError::Validation(format!(
            "matching.semantic_weight + matching.rule_weight must equal 1, got {}",
            m.semantic_weight + m.rule_weight
        )));
    }

    if m.dream_brand_boost < 1.0 {
        return Err(ConfigError::Validation(format!(
            "matching.dream_brand_boost must be at least 1, got {}",
            m.dream_brand_boost
        )));
    }

    if !(0.0..1.0).contains(&m.follower_tolerance) {
        return Err(ConfigError::Validation(format!(
            "matching.follower_tolerance must be within [0, 1), got {}",
            m.follower_tolerance
        )));
    }

    if !(0.0..=1.0).contains(&m.engagement_tolerance) {
        return Err(ConfigError::Validation(format!(
            "matching.engagement_tolerance must be within [0, 1], got {}",
            m.engagement_tolerance
        )));
    }

    if !(-1.0..=1.0).contains(&m.semantic_floor)
        || !(-1.0..=1.0).contains(&m.semantic_ceiling)
        || m.semantic_floor >= m.semantic_ceiling
    {
        return Err(ConfigError::Validation(format!(
            "matching semantic window [{}, {}] must be increasing and within [-1, 1]",
            m.semantic_floor, m.semantic_ceiling
        )));
    }

    let t = m.tiers;
    if !(t.good <= t.great && t.great <= t.golden && t.golden <= 100) {
        return Err(ConfigError::Validation(format!(
            "matching.tiers must satisfy good <= great <= golden <= 100, got {}/{}/{}",
            t.good, t.great, t.golden
        )));
    }

    let h = &tuning.health;
    if h.negotiation_stall_days < 0 || h.execution_stall_days < 0 || h.review_stall_days < 0 {
        return Err(ConfigError::Validation(
            "health stall thresholds must be non-negative".to_string(),
        ));
    }
    if h.execution_min_progress > 100 || h.communication_floor > 100 {
        return Err(ConfigError::Validation(
            "health percentage thresholds must be within 0..=100".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "tuning_test.rs"]
mod tests;
