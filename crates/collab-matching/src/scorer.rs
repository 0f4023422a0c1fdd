//! Hybrid match scoring: rule-based criteria blended with embedding similarity.

use collab_core::{Brief, CreatorProfile, MatchReasons, MatchResult, ScoringConfig};

use crate::availability::campaign_types_compatible;
use crate::similarity::cosine_similarity;
use crate::MatchingError;

pub const SEEKING_POINTS: u8 = 25;
pub const NICHE_POINTS: u8 = 25;
pub const FOLLOWER_POINTS: u8 = 20;
pub const FOLLOWER_PARTIAL_POINTS: u8 = 10;
pub const ENGAGEMENT_POINTS: u8 = 15;
pub const ENGAGEMENT_PARTIAL_POINTS: u8 = 8;
pub const BUDGET_POINTS: u8 = 10;
pub const CAMPAIGN_TYPE_POINTS: u8 = 5;

/// Rule-based score with the criteria that earned full credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleScore {
    pub score: u8,
    pub reasons: MatchReasons,
}

/// Brief-side inputs shared by every creator scored in one run.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    pub brief: &'a Brief,
    /// `None` when semantic matching is disabled or unavailable.
    pub brief_embedding: Option<&'a [f32]>,
    pub brand_name: Option<&'a str>,
}

/// Score a brief against a creator with the additive rule table.
///
/// Independent of embeddings; the result is capped at 100.
#[must_use]
pub fn rule_score(brief: &Brief, creator: &CreatorProfile, config: &ScoringConfig) -> RuleScore {
    let mut score: u32 = 0;
    let mut reasons = MatchReasons::default();

    if creator.is_seeking {
        score += u32::from(SEEKING_POINTS);
    }

    if niche_matches(&brief.target_niches, creator.niche.as_deref()) {
        score += u32::from(NICHE_POINTS);
        reasons.niche_match = true;
    }

    match follower_fit(
        creator.follower_count,
        brief.min_followers,
        brief.max_followers,
        config.follower_tolerance,
    ) {
        Fit::Full => {
            score += u32::from(FOLLOWER_POINTS);
            reasons.follower_match = true;
        }
        Fit::Partial => score += u32::from(FOLLOWER_PARTIAL_POINTS),
        Fit::None => {}
    }

    match engagement_fit(
        creator.engagement_rate,
        brief.min_engagement_rate,
        config.engagement_tolerance,
    ) {
        Fit::Full => {
            score += u32::from(ENGAGEMENT_POINTS);
            reasons.engagement_match = true;
        }
        Fit::Partial => score += u32::from(ENGAGEMENT_PARTIAL_POINTS),
        Fit::None => {}
    }

    let budget_fits = match (brief.budget_ceiling(), creator.min_budget) {
        (Some(ceiling), Some(minimum)) => ceiling >= minimum,
        _ => true,
    };
    if budget_fits {
        score += u32::from(BUDGET_POINTS);
        reasons.budget_match = true;
    }

    if campaign_types_compatible(&creator.preferred_campaign_types, &brief.campaign_types) {
        score += u32::from(CAMPAIGN_TYPE_POINTS);
        reasons.campaign_type_match = true;
    }

    RuleScore {
        score: u8::try_from(score.min(100)).unwrap_or(100),
        reasons,
    }
}

/// Map cosine similarity onto 0–100 through the configured window.
///
/// Returns 0 when either side has no embedding.
///
/// # Errors
///
/// Returns [`MatchingError::DimensionMismatch`] if the vectors differ in length.
pub fn semantic_score(
    brief_embedding: Option<&[f32]>,
    creator_embedding: Option<&[f32]>,
    config: &ScoringConfig,
) -> Result<u8, MatchingError> {
    let (Some(a), Some(b)) = (brief_embedding, creator_embedding) else {
        return Ok(0);
    };

    let similarity = f64::from(cosine_similarity(a, b)?);
    if similarity <= config.semantic_floor {
        return Ok(0);
    }

    let span = config.semantic_ceiling - config.semantic_floor;
    let scaled = (similarity - config.semantic_floor) / span * 100.0;
    Ok(to_score(scaled))
}

/// Whether the brand appears in the creator's dream-brand list.
///
/// Trimmed, case-insensitive substring match in either direction.
#[must_use]
pub fn is_dream_brand(brand_name: Option<&str>, dream_brands: &[String]) -> bool {
    let Some(brand) = brand_name.map(|b| b.trim().to_lowercase()) else {
        return false;
    };
    if brand.is_empty() {
        return false;
    }

    dream_brands.iter().any(|dream| {
        let dream = dream.trim().to_lowercase();
        !dream.is_empty() && (dream.contains(&brand) || brand.contains(&dream))
    })
}

/// Blend the component scores and apply the dream-brand boost.
///
/// Without a semantic signal the rule score stands alone.
#[must_use]
pub fn hybrid_score(semantic: u8, rule: u8, dream_brand: bool, config: &ScoringConfig) -> u8 {
    let base = if semantic > 0 {
        (config.semantic_weight * f64::from(semantic) + config.rule_weight * f64::from(rule))
            .round()
    } else {
        f64::from(rule)
    };

    let boosted = if dream_brand {
        base * config.dream_brand_boost
    } else {
        base
    };

    to_score(boosted)
}

/// Compute the full match result for one creator.
///
/// A dimension mismatch between the two embeddings is logged and scored as
/// no semantic signal rather than failing the run.
#[must_use]
pub fn score_match(
    input: &MatchInput<'_>,
    creator: &CreatorProfile,
    config: &ScoringConfig,
) -> MatchResult {
    let rule = rule_score(input.brief, creator, config);

    let semantic = semantic_score(
        input.brief_embedding,
        creator.embedding.as_deref(),
        config,
    )
    .unwrap_or_else(|e| {
        tracing::warn!(
            brief_id = %input.brief.id,
            creator_id = %creator.id,
            error = %e,
            "embedding comparison failed; scoring without semantic signal"
        );
        0
    });

    let dream = is_dream_brand(input.brand_name, &creator.dream_brands);
    let hybrid = hybrid_score(semantic, rule.score, dream, config);

    let mut reasons = rule.reasons;
    reasons.semantic_match = semantic > config.semantic_match_threshold;
    reasons.dream_brand_match = dream;

    MatchResult {
        creator_id: creator.id,
        hybrid_score: hybrid,
        semantic_score: semantic,
        rule_score: rule.score,
        reasons,
        is_dream_brand: dream,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    Full,
    Partial,
    None,
}

fn niche_matches(target_niches: &[String], creator_niche: Option<&str>) -> bool {
    let targets: Vec<String> = target_niches
        .iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect();
    if targets.is_empty() {
        return true;
    }

    let Some(niche) = creator_niche.map(|n| n.trim().to_lowercase()) else {
        return false;
    };
    if niche.is_empty() {
        return false;
    }

    targets
        .iter()
        .any(|t| niche.contains(t.as_str()) || t.contains(niche.as_str()))
}

#[allow(clippy::cast_precision_loss)]
fn follower_fit(count: i64, min: Option<i64>, max: Option<i64>, tolerance: f64) -> Fit {
    let count = count as f64;
    let lo = min.map(|m| m as f64);
    let hi = max.map(|m| m as f64);

    let within = |lo: Option<f64>, hi: Option<f64>| {
        lo.is_none_or(|lo| count >= lo) && hi.is_none_or(|hi| count <= hi)
    };

    if within(lo, hi) {
        Fit::Full
    } else if within(
        lo.map(|lo| lo * (1.0 - tolerance)),
        hi.map(|hi| hi * (1.0 + tolerance)),
    ) {
        Fit::Partial
    } else {
        Fit::None
    }
}

fn engagement_fit(rate: f64, minimum: Option<f64>, tolerance: f64) -> Fit {
    match minimum {
        None => Fit::Full,
        Some(min) if rate >= min => Fit::Full,
        Some(min) if rate >= min * tolerance => Fit::Partial,
        Some(_) => Fit::None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
