//! Matching run orchestration.

use chrono::Utc;
use collab_core::{
    Brief, CandidateFilter, CreatorResponse, MatchRecord, MatchResult, MatchTier, MatchingStore,
    ScoringConfig,
};
use uuid::Uuid;

use crate::availability::{check_availability, AvailabilityConstraints};
use crate::embeddings::Embedder;
use crate::error::MatchingError;
use crate::scorer::{score_match, MatchInput};
use crate::types::{MatchOptions, MatchRun, MatchingConfig};

/// Run the full matching pipeline for one brief.
///
/// 1. Load and validate the brief.
/// 2. Resolve the brand name and the brief embedding concurrently. A missing
///    or failing embedding provider degrades the run to rule-only scoring.
/// 3. Fetch pre-filtered candidates from the store.
/// 4. Re-check availability and score each candidate.
/// 5. Filter by `min_score`, sort best first, truncate to `max_matches`.
/// 6. Persist the surviving matches as one batch.
///
/// # Errors
///
/// Returns [`MatchingError::BriefNotFound`] for an unknown brief,
/// [`MatchingError::Validation`] for a malformed brief, and
/// [`MatchingError::Persistence`] if the candidate read or the batch write
/// fails. Embedding failures are never returned.
pub async fn match_brief_to_creators<S, E>(
    store: &S,
    embedder: Option<&E>,
    config: &MatchingConfig,
    brief_id: Uuid,
    options: MatchOptions,
) -> Result<MatchRun, MatchingError>
where
    S: MatchingStore,
    E: Embedder,
{
    let brief = store.get_brief(brief_id).await?;
    brief.validate()?;

    let (brand_name, brief_embedding) = futures::join!(
        resolve_brand_name(store, &brief),
        resolve_embedding(
            store,
            embedder,
            config,
            &brief,
            options.use_semantic_matching
        ),
    );
    let semantic_enabled = brief_embedding.is_some();

    let filter = candidate_filter(&brief, &config.scoring);
    let candidates = store
        .list_candidate_creators(&filter)
        .await
        .map_err(MatchingError::Persistence)?;
    let candidate_count = candidates.len();

    let constraints = AvailabilityConstraints::from_brief(&brief);
    let input = MatchInput {
        brief: &brief,
        brief_embedding: brief_embedding.as_deref(),
        brand_name: brand_name.as_deref(),
    };

    let mut unavailable = 0usize;
    let mut results: Vec<MatchResult> = Vec::with_capacity(candidate_count);
    for creator in &candidates {
        let availability = check_availability(creator, &constraints);
        if !availability.available {
            unavailable += 1;
            let unmet: Vec<String> = availability.unmet.iter().map(ToString::to_string).collect();
            tracing::debug!(
                brief_id = %brief.id,
                creator_id = %creator.id,
                unmet = ?unmet,
                "creator failed availability re-check"
            );
            continue;
        }
        results.push(score_match(&input, creator, &config.scoring));
    }

    let ranked = rank_results(results, options);

    let created_at = Utc::now();
    let records: Vec<MatchRecord> = ranked
        .into_iter()
        .map(|result| MatchRecord {
            id: Uuid::new_v4(),
            brief_id: brief.id,
            tier: MatchTier::for_score(result.hybrid_score, &config.scoring.tiers),
            result,
            creator_response: CreatorResponse::Pending,
            created_at,
        })
        .collect();

    if !records.is_empty() {
        store
            .insert_matches(&records)
            .await
            .map_err(MatchingError::Persistence)?;
    }

    tracing::info!(
        brief_id = %brief.id,
        candidates = candidate_count,
        unavailable,
        matches = records.len(),
        semantic_enabled,
        "matching run complete"
    );

    Ok(MatchRun {
        matches: records,
        candidates: candidate_count,
        unavailable,
        semantic_enabled,
    })
}

/// Keep results at or above `min_score`, best first, at most `max_matches`.
///
/// Ties on the hybrid score are broken by rule score, then creator id, so
/// repeated runs over the same data rank identically.
pub(crate) fn rank_results(
    mut results: Vec<MatchResult>,
    options: MatchOptions,
) -> Vec<MatchResult> {
    results.retain(|r| r.hybrid_score >= options.min_score);
    results.sort_by(|a, b| {
        b.hybrid_score
            .cmp(&a.hybrid_score)
            .then_with(|| b.rule_score.cmp(&a.rule_score))
            .then_with(|| a.creator_id.cmp(&b.creator_id))
    });
    results.truncate(options.max_matches);
    results
}

/// Store-side pre-filter for a brief.
///
/// Follower and engagement floors are relaxed by the scoring tolerances so
/// creators eligible for partial credit still reach the scorer.
pub(crate) fn candidate_filter(brief: &Brief, scoring: &ScoringConfig) -> CandidateFilter {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    let widen = |value: i64, factor: f64, round_up: bool| -> i64 {
        let scaled = value as f64 * factor;
        if round_up {
            scaled.ceil() as i64
        } else {
            scaled.floor() as i64
        }
    };

    CandidateFilter {
        budget_ceiling: brief.budget_ceiling(),
        campaign_types: brief
            .campaign_types
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect(),
        min_followers: brief
            .min_followers
            .map(|min| widen(min, 1.0 - scoring.follower_tolerance, false)),
        max_followers: brief
            .max_followers
            .map(|max| widen(max, 1.0 + scoring.follower_tolerance, true)),
        min_engagement_rate: brief
            .min_engagement_rate
            .map(|min| min * scoring.engagement_tolerance),
    }
}

async fn resolve_brand_name<S: MatchingStore>(store: &S, brief: &Brief) -> Option<String> {
    match store.get_brand_name(brief.brand_id).await {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!(
                brief_id = %brief.id,
                brand_id = %brief.brand_id,
                error = %e,
                "brand lookup failed; dream-brand boost disabled for this run"
            );
            None
        }
    }
}

/// Stored embedding if present, otherwise a fresh one from the provider.
///
/// Returns `None` whenever semantic matching cannot be used.
async fn resolve_embedding<S, E>(
    store: &S,
    embedder: Option<&E>,
    config: &MatchingConfig,
    brief: &Brief,
    enabled: bool,
) -> Option<Vec<f32>>
where
    S: MatchingStore,
    E: Embedder,
{
    if !enabled {
        return None;
    }

    if let Some(existing) = brief.embedding.as_ref().filter(|e| !e.is_empty()) {
        return Some(existing.clone());
    }

    let Some(embedder) = embedder else {
        tracing::debug!(brief_id = %brief.id, "no embedding provider configured");
        return None;
    };

    let text = brief.embedding_text();
    match tokio::time::timeout(config.embed_timeout, embedder.embed(&text)).await {
        Ok(Ok(embedding)) => {
            if let Err(e) = store.save_brief_embedding(brief.id, &embedding).await {
                tracing::warn!(
                    brief_id = %brief.id,
                    error = %e,
                    "failed to persist brief embedding"
                );
            }
            Some(embedding)
        }
        Ok(Err(e)) => {
            tracing::warn!(
                brief_id = %brief.id,
                error = %e,
                "embedding unavailable; falling back to rule-only matching"
            );
            None
        }
        Err(_) => {
            tracing::warn!(
                brief_id = %brief.id,
                timeout_ms = u64::try_from(config.embed_timeout.as_millis()).unwrap_or(u64::MAX),
                "embedding timed out; falling back to rule-only matching"
            );
            None
        }
    }
}
