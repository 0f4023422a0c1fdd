//! Database operations for the `creators` table.

use collab_core::{CandidateFilter, CreatorProfile};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `creators` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorRow {
    pub id: Uuid,
    pub display_name: String,
    pub niche: Option<String>,
    pub follower_count: i64,
    pub engagement_rate: f64,
    pub is_seeking: bool,
    pub partnership_capacity: i32,
    pub current_partnerships: i32,
    pub min_budget: Option<Decimal>,
    pub preferred_campaign_types: Vec<String>,
    pub dream_brands: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

impl From<CreatorRow> for CreatorProfile {
    fn from(row: CreatorRow) -> Self {
        Self {
            id: row.id,
            display_name: row.display_name,
            niche: row.niche,
            follower_count: row.follower_count,
            engagement_rate: row.engagement_rate,
            is_seeking: row.is_seeking,
            partnership_capacity: row.partnership_capacity,
            current_partnerships: row.current_partnerships,
            min_budget: row.min_budget,
            preferred_campaign_types: row.preferred_campaign_types,
            dream_brands: row.dream_brands,
            embedding: row.embedding.filter(|e| !e.is_empty()),
        }
    }
}

/// Returns seeking creators with spare capacity that pass `filter`.
///
/// Mirrors [`CandidateFilter::admits`]. Campaign types are compared
/// trimmed and lowercased; a creator with no preferred types is never
/// excluded by the type filter.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_candidate_creators(
    pool: &PgPool,
    filter: &CandidateFilter,
) -> Result<Vec<CreatorProfile>, DbError> {
    let rows = sqlx::query_as::<_, CreatorRow>(
        "SELECT id, display_name, niche, follower_count, engagement_rate, is_seeking, \
                partnership_capacity, current_partnerships, min_budget, \
                preferred_campaign_types, dream_brands, embedding \
         FROM creators \
         WHERE is_seeking = TRUE \
           AND current_partnerships < partnership_capacity \
           AND ($1::numeric IS NULL OR min_budget IS NULL OR min_budget <= $1) \
           AND (cardinality($2::text[]) = 0 \
                OR cardinality(preferred_campaign_types) = 0 \
                OR EXISTS (SELECT 1 FROM unnest(preferred_campaign_types) AS t(kind) \
                           WHERE lower(btrim(t.kind)) = ANY($2))) \
           AND ($3::bigint IS NULL OR follower_count >= $3) \
           AND ($4::bigint IS NULL OR follower_count <= $4) \
           AND ($5::float8 IS NULL OR engagement_rate >= $5) \
         ORDER BY id",
    )
    .bind(filter.budget_ceiling)
    .bind(&filter.campaign_types)
    .bind(filter.min_followers)
    .bind(filter.max_followers)
    .bind(filter.min_engagement_rate)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CreatorProfile::from).collect())
}
