//! Database operations for the `briefs` table.

use collab_core::Brief;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `briefs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BriefRow {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub target_niches: Vec<String>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
    pub min_engagement_rate: Option<f64>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub campaign_types: Vec<String>,
    /// `REAL[]`; `NULL` until the first matching run computes it.
    pub embedding: Option<Vec<f32>>,
}

impl From<BriefRow> for Brief {
    fn from(row: BriefRow) -> Self {
        Self {
            id: row.id,
            brand_id: row.brand_id,
            title: row.title,
            description: row.description,
            product_name: row.product_name,
            product_description: row.product_description,
            target_niches: row.target_niches,
            min_followers: row.min_followers,
            max_followers: row.max_followers,
            min_engagement_rate: row.min_engagement_rate,
            budget_min: row.budget_min,
            budget_max: row.budget_max,
            campaign_types: row.campaign_types,
            embedding: row.embedding.filter(|e| !e.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Fetches a single brief by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no brief exists with the given id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_brief(pool: &PgPool, brief_id: Uuid) -> Result<Brief, DbError> {
    let row = sqlx::query_as::<_, BriefRow>(
        "SELECT id, brand_id, title, description, product_name, product_description, \
                target_niches, min_followers, max_followers, min_engagement_rate, \
                budget_min, budget_max, campaign_types, embedding \
         FROM briefs \
         WHERE id = $1",
    )
    .bind(brief_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound {
        entity: "brief",
        id: brief_id,
    })?;

    Ok(row.into())
}

/// Returns the brand that owns a brief.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no brief exists with the given id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_brief_brand_id(pool: &PgPool, brief_id: Uuid) -> Result<Uuid, DbError> {
    sqlx::query_scalar::<_, Uuid>("SELECT brand_id FROM briefs WHERE id = $1")
        .bind(brief_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound {
            entity: "brief",
            id: brief_id,
        })
}

/// Stores a computed embedding on a brief.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the brief no longer exists, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn save_brief_embedding(
    pool: &PgPool,
    brief_id: Uuid,
    embedding: &[f32],
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE briefs SET embedding = $1, updated_at = NOW() \
         WHERE id = $2",
    )
    .bind(embedding)
    .bind(brief_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            entity: "brief",
            id: brief_id,
        });
    }

    Ok(())
}
