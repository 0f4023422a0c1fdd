//! End-to-end matching runs against the in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use collab_core::{Brief, CreatorProfile, CreatorResponse, MatchTier, MatchingStore};
use collab_db::MemoryStore;
use collab_matching::{
    match_brief_to_creators, Embedder, MatchOptions, MatchingConfig, MatchingError,
};
use rust_decimal::Decimal;
use uuid::Uuid;

struct FixedEmbedder {
    vector: Vec<f32>,
    calls: AtomicUsize,
}

impl FixedEmbedder {
    fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, MatchingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector.clone())
    }
}

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, MatchingError> {
        Err(MatchingError::EmbeddingUnavailable(
            "provider offline".to_string(),
        ))
    }
}

struct SlowEmbedder;

impl Embedder for SlowEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, MatchingError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(vec![1.0, 0.0])
    }
}

const NO_EMBEDDER: Option<&FixedEmbedder> = None;

struct Fixture {
    store: MemoryStore,
    brief_id: Uuid,
    creator_id: Uuid,
}

fn fitness_brief(brand_id: Uuid) -> Brief {
    Brief {
        id: Uuid::new_v4(),
        brand_id,
        title: "Summer shred".to_string(),
        description: Some("Eight-week cut with our whey".to_string()),
        product_name: Some("Acme Whey".to_string()),
        product_description: None,
        target_niches: vec!["fitness".to_string()],
        min_followers: Some(10_000),
        max_followers: Some(100_000),
        min_engagement_rate: Some(2.0),
        budget_min: None,
        budget_max: Some(Decimal::from(500)),
        campaign_types: vec!["reel".to_string()],
        embedding: None,
    }
}

fn fitness_creator() -> CreatorProfile {
    let mut c = CreatorProfile::new(Uuid::new_v4(), "Jo Lifts");
    c.niche = Some("fitness".to_string());
    c.follower_count = 50_000;
    c.engagement_rate = 3.0;
    c.min_budget = Some(Decimal::from(300));
    c.preferred_campaign_types = vec!["reel".to_string(), "post".to_string()];
    c
}

fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let brand_id = Uuid::new_v4();
    store.insert_brand(brand_id, "Acme Nutrition");

    let brief = fitness_brief(brand_id);
    let brief_id = brief.id;
    store.insert_brief(brief);

    let creator = fitness_creator();
    let creator_id = creator.id;
    store.insert_creator(creator);

    Fixture {
        store,
        brief_id,
        creator_id,
    }
}

#[tokio::test]
async fn fitness_brief_produces_one_golden_match() {
    let fx = fixture();

    let run = match_brief_to_creators(
        &fx.store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .expect("run succeeds");

    assert_eq!(run.candidates, 1);
    assert_eq!(run.unavailable, 0);
    assert!(!run.semantic_enabled);
    assert_eq!(run.matches.len(), 1);

    let record = &run.matches[0];
    assert_eq!(record.brief_id, fx.brief_id);
    assert_eq!(record.result.creator_id, fx.creator_id);
    assert_eq!(record.result.rule_score, 100);
    assert_eq!(record.result.semantic_score, 0);
    assert_eq!(record.result.hybrid_score, 100);
    assert_eq!(record.tier, MatchTier::Golden);
    assert_eq!(record.creator_response, CreatorResponse::Pending);

    let stored = fx.store.list_matches(fx.brief_id).await.unwrap();
    assert_eq!(stored, run.matches);
}

#[tokio::test]
async fn creator_above_budget_ceiling_is_filtered_before_scoring() {
    let fx = fixture();
    let mut pricey = fitness_creator();
    pricey.min_budget = Some(Decimal::from(600));
    let pricey_id = pricey.id;
    fx.store.insert_creator(pricey);

    let run = match_brief_to_creators(
        &fx.store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .unwrap();

    assert!(run
        .matches
        .iter()
        .all(|m| m.result.creator_id != pricey_id));
}

#[tokio::test]
async fn unknown_brief_is_not_found() {
    let fx = fixture();
    let missing = Uuid::new_v4();

    let err = match_brief_to_creators(
        &fx.store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        missing,
        MatchOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MatchingError::BriefNotFound(id) if id == missing));
}

#[tokio::test]
async fn malformed_brief_is_rejected() {
    let store = MemoryStore::new();
    let mut brief = fitness_brief(Uuid::new_v4());
    brief.min_followers = Some(200_000);
    let brief_id = brief.id;
    store.insert_brief(brief);

    let err = match_brief_to_creators(
        &store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        brief_id,
        MatchOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MatchingError::Validation(_)));
    assert!(store.all_matches().is_empty());
}

#[tokio::test]
async fn fresh_embedding_is_used_and_written_back() {
    let fx = fixture();
    let mut creator = fx.store.creator(fx.creator_id).unwrap();
    creator.embedding = Some(vec![0.6, 0.8]);
    creator.niche = Some("cooking".to_string());
    fx.store.insert_creator(creator);

    let embedder = FixedEmbedder::new(vec![0.6, 0.8]);
    let run = match_brief_to_creators(
        &fx.store,
        Some(&embedder),
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(embedder.calls(), 1);
    assert!(run.semantic_enabled);
    let result = &run.matches[0].result;
    assert_eq!(result.semantic_score, 100);
    assert_eq!(result.rule_score, 75);
    assert_eq!(result.hybrid_score, 90);
    assert!(result.reasons.semantic_match);

    let saved = fx.store.brief(fx.brief_id).unwrap();
    assert_eq!(saved.embedding, Some(vec![0.6, 0.8]));
}

#[tokio::test]
async fn stored_embedding_skips_the_provider() {
    let fx = fixture();
    let mut brief = fx.store.brief(fx.brief_id).unwrap();
    brief.embedding = Some(vec![1.0, 0.0]);
    fx.store.insert_brief(brief);

    let embedder = FixedEmbedder::new(vec![0.0, 1.0]);
    let run = match_brief_to_creators(
        &fx.store,
        Some(&embedder),
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(embedder.calls(), 0);
    assert!(run.semantic_enabled);
}

#[tokio::test]
async fn semantic_matching_can_be_switched_off() {
    let fx = fixture();
    let embedder = FixedEmbedder::new(vec![1.0, 0.0]);

    let run = match_brief_to_creators(
        &fx.store,
        Some(&embedder),
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions {
            use_semantic_matching: false,
            ..MatchOptions::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(embedder.calls(), 0);
    assert!(!run.semantic_enabled);
    assert!(fx.store.brief(fx.brief_id).unwrap().embedding.is_none());
}

#[tokio::test]
async fn provider_failure_degrades_to_rule_only() {
    let fx = fixture();

    let run = match_brief_to_creators(
        &fx.store,
        Some(&FailingEmbedder),
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .expect("embedding failure is not fatal");

    assert!(!run.semantic_enabled);
    assert_eq!(run.matches.len(), 1);
    assert_eq!(run.matches[0].result.hybrid_score, 100);
}

#[tokio::test]
async fn provider_timeout_degrades_to_rule_only() {
    let fx = fixture();
    let config = MatchingConfig {
        embed_timeout: Duration::from_millis(50),
        ..MatchingConfig::default()
    };

    let run = match_brief_to_creators(
        &fx.store,
        Some(&SlowEmbedder),
        &config,
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .expect("timeout is not fatal");

    assert!(!run.semantic_enabled);
    assert_eq!(run.matches.len(), 1);
}

#[tokio::test]
async fn embedding_write_back_failure_is_not_fatal() {
    let fx = fixture();
    fx.store.fail_embedding_writes(true);
    let embedder = FixedEmbedder::new(vec![1.0, 0.0]);

    let run = match_brief_to_creators(
        &fx.store,
        Some(&embedder),
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .unwrap();

    assert!(run.semantic_enabled);
    assert!(fx.store.brief(fx.brief_id).unwrap().embedding.is_none());
}

#[tokio::test]
async fn partial_credit_candidates_reach_the_scorer() {
    let fx = fixture();
    let mut small = fitness_creator();
    small.follower_count = 9_000;
    let small_id = small.id;
    fx.store.insert_creator(small);

    let run = match_brief_to_creators(
        &fx.store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .unwrap();

    let small_match = run
        .matches
        .iter()
        .find(|m| m.result.creator_id == small_id)
        .expect("creator inside the widened band is scored");
    assert_eq!(small_match.result.rule_score, 90);
    assert_eq!(run.matches[0].result.creator_id, fx.creator_id);
}

#[tokio::test]
async fn min_score_and_max_matches_are_applied() {
    let fx = fixture();
    for niche in ["cooking", "travel", "gaming"] {
        let mut c = fitness_creator();
        c.niche = Some(niche.to_string());
        fx.store.insert_creator(c);
    }

    let run = match_brief_to_creators(
        &fx.store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions {
            min_score: 80,
            ..MatchOptions::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(run.candidates, 4);
    assert_eq!(run.matches.len(), 1);

    let capped = match_brief_to_creators(
        &fx.store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions {
            max_matches: 2,
            ..MatchOptions::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(capped.matches.len(), 2);
    assert!(capped.matches[0].result.hybrid_score >= capped.matches[1].result.hybrid_score);
}

#[tokio::test]
async fn dream_brand_creator_is_boosted() {
    let fx = fixture();
    let mut fan = fitness_creator();
    fan.niche = Some("travel".to_string());
    fan.dream_brands = vec!["acme".to_string()];
    let fan_id = fan.id;
    fx.store.insert_creator(fan);

    let run = match_brief_to_creators(
        &fx.store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .unwrap();

    let fan_match = run
        .matches
        .iter()
        .find(|m| m.result.creator_id == fan_id)
        .unwrap();
    assert!(fan_match.result.is_dream_brand);
    assert_eq!(fan_match.result.rule_score, 75);
    assert_eq!(fan_match.result.hybrid_score, 100);
}

#[tokio::test]
async fn failed_batch_write_surfaces_and_persists_nothing() {
    let fx = fixture();
    fx.store.fail_match_writes(true);

    let err = match_brief_to_creators(
        &fx.store,
        NO_EMBEDDER,
        &MatchingConfig::default(),
        fx.brief_id,
        MatchOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MatchingError::Persistence(_)));
    assert!(fx.store.all_matches().is_empty());
}
