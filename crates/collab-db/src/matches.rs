//! Database operations for the `matches` table.

use chrono::{DateTime, Utc};
use collab_core::{CreatorResponse, MatchReasons, MatchRecord, MatchResult, MatchTier};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `matches` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub brief_id: Uuid,
    pub creator_id: Uuid,
    pub hybrid_score: i16,
    pub semantic_score: i16,
    pub rule_score: i16,
    pub tier: String,
    pub reasons: Json<MatchReasons>,
    pub is_dream_brand: bool,
    pub creator_response: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for MatchRecord {
    type Error = DbError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let tier = row.tier.parse::<MatchTier>().map_err(|e| DbError::Decode {
            column: "matches.tier",
            reason: e.to_string(),
        })?;
        let creator_response =
            row.creator_response
                .parse::<CreatorResponse>()
                .map_err(|e| DbError::Decode {
                    column: "matches.creator_response",
                    reason: e.to_string(),
                })?;

        Ok(Self {
            id: row.id,
            brief_id: row.brief_id,
            result: MatchResult {
                creator_id: row.creator_id,
                hybrid_score: score_from_column("matches.hybrid_score", row.hybrid_score)?,
                semantic_score: score_from_column("matches.semantic_score", row.semantic_score)?,
                rule_score: score_from_column("matches.rule_score", row.rule_score)?,
                reasons: row.reasons.0,
                is_dream_brand: row.is_dream_brand,
            },
            tier,
            creator_response,
            created_at: row.created_at,
        })
    }
}

fn score_from_column(column: &'static str, value: i16) -> Result<u8, DbError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| DbError::Decode {
            column,
            reason: format!("score {value} outside 0..=100"),
        })
}

const MATCH_COLUMNS: &str = "id, brief_id, creator_id, hybrid_score, semantic_score, rule_score, \
     tier, reasons, is_dream_brand, creator_response, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a whole matching run in one transaction.
///
/// Either every record is committed or none is.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert or the commit fails.
pub async fn insert_matches(pool: &PgPool, records: &[MatchRecord]) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    for record in records {
        sqlx::query(
            "INSERT INTO matches (id, brief_id, creator_id, hybrid_score, semantic_score, \
                                  rule_score, tier, reasons, is_dream_brand, \
                                  creator_response, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(record.id)
        .bind(record.brief_id)
        .bind(record.result.creator_id)
        .bind(i16::from(record.result.hybrid_score))
        .bind(i16::from(record.result.semantic_score))
        .bind(i16::from(record.result.rule_score))
        .bind(record.tier.as_str())
        .bind(Json(record.result.reasons))
        .bind(record.result.is_dream_brand)
        .bind(record.creator_response.as_str())
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Returns all matches for a brief, best first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::Decode`] if a
/// stored enum value is not recognised.
pub async fn list_matches(pool: &PgPool, brief_id: Uuid) -> Result<Vec<MatchRecord>, DbError> {
    let rows = sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches \
         WHERE brief_id = $1 \
         ORDER BY hybrid_score DESC, rule_score DESC, creator_id"
    ))
    .bind(brief_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(MatchRecord::try_from).collect()
}

/// Fetches a single match by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no match exists with the given id,
/// [`DbError::Decode`] for unrecognised stored values, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn get_match(pool: &PgPool, match_id: Uuid) -> Result<MatchRecord, DbError> {
    let row = sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
    ))
    .bind(match_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound {
        entity: "match",
        id: match_id,
    })?;

    MatchRecord::try_from(row)
}
