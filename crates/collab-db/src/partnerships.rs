//! Database operations for the `partnerships` table.
//!
//! Every write is conditioned on the `(status, updated_at)` pair the caller
//! read, and capacity counter changes on `creators` run in the same
//! transaction as the partnership write.

use chrono::{DateTime, Utc};
use collab_core::{
    Deliverable, Partnership, PartnershipFilter, PartnershipStatus, PartnershipVersion,
};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `partnerships` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PartnershipRow {
    pub id: Uuid,
    pub match_id: Option<Uuid>,
    pub brand_id: Uuid,
    pub creator_id: Uuid,
    pub agreed_rate: Option<Decimal>,
    pub deliverables: Json<Vec<Deliverable>>,
    pub status: String,
    pub content_submitted_at: Option<DateTime<Utc>>,
    pub content_approved_at: Option<DateTime<Utc>>,
    pub payment_sent_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// The schema constrains ratings to `1..=5`.
    pub brand_rates_creator: Option<i16>,
    pub creator_rates_brand: Option<i16>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PartnershipRow> for Partnership {
    type Error = DbError;

    fn try_from(row: PartnershipRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<PartnershipStatus>()
            .map_err(|e| DbError::Decode {
                column: "partnerships.status",
                reason: e.to_string(),
            })?;

        Ok(Self {
            id: row.id,
            match_id: row.match_id,
            brand_id: row.brand_id,
            creator_id: row.creator_id,
            agreed_rate: row.agreed_rate,
            deliverables: row.deliverables.0,
            status,
            content_submitted_at: row.content_submitted_at,
            content_approved_at: row.content_approved_at,
            payment_sent_at: row.payment_sent_at,
            completed_at: row.completed_at,
            brand_rates_creator: rating_from_column(
                "partnerships.brand_rates_creator",
                row.brand_rates_creator,
            )?,
            creator_rates_brand: rating_from_column(
                "partnerships.creator_rates_brand",
                row.creator_rates_brand,
            )?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rating_from_column(column: &'static str, value: Option<i16>) -> Result<Option<u8>, DbError> {
    value
        .map(|v| {
            u8::try_from(v).map_err(|_| DbError::Decode {
                column,
                reason: format!("rating {v} out of range"),
            })
        })
        .transpose()
}

const PARTNERSHIP_COLUMNS: &str = "id, match_id, brand_id, creator_id, agreed_rate, deliverables, \
     status, content_submitted_at, content_approved_at, payment_sent_at, completed_at, \
     brand_rates_creator, creator_rates_brand, notes, created_at, updated_at";

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Inserts a partnership and takes one of the creator's capacity slots.
///
/// The slot is taken with `current_partnerships + 1` guarded by
/// `current_partnerships < partnership_capacity`; if the guard fails the
/// transaction is rolled back and nothing is written.
///
/// # Errors
///
/// Returns [`DbError::CapacityExceeded`] if the creator is full,
/// [`DbError::NotFound`] if the creator does not exist, or [`DbError::Sqlx`]
/// if any statement fails.
pub async fn insert_partnership(pool: &PgPool, partnership: &Partnership) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let slot = sqlx::query(
        "UPDATE creators \
         SET current_partnerships = current_partnerships + 1, updated_at = NOW() \
         WHERE id = $1 AND current_partnerships < partnership_capacity",
    )
    .bind(partnership.creator_id)
    .execute(&mut *tx)
    .await?;

    if slot.rows_affected() == 0 {
        let exists = creator_exists(&mut tx, partnership.creator_id).await?;
        return Err(if exists {
            DbError::CapacityExceeded {
                creator_id: partnership.creator_id,
            }
        } else {
            DbError::NotFound {
                entity: "creator",
                id: partnership.creator_id,
            }
        });
    }

    sqlx::query(&format!(
        "INSERT INTO partnerships ({PARTNERSHIP_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"
    ))
    .bind(partnership.id)
    .bind(partnership.match_id)
    .bind(partnership.brand_id)
    .bind(partnership.creator_id)
    .bind(partnership.agreed_rate)
    .bind(Json(&partnership.deliverables))
    .bind(partnership.status.as_str())
    .bind(partnership.content_submitted_at)
    .bind(partnership.content_approved_at)
    .bind(partnership.payment_sent_at)
    .bind(partnership.completed_at)
    .bind(partnership.brand_rates_creator.map(i16::from))
    .bind(partnership.creator_rates_brand.map(i16::from))
    .bind(partnership.notes.as_deref())
    .bind(partnership.created_at)
    .bind(partnership.updated_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Overwrites the mutable fields of a partnership if it still matches
/// `expected`.
///
/// When `release_slot` is set the creator's counter is decremented (floored
/// at zero) in the same transaction.
///
/// # Errors
///
/// Returns [`DbError::Conflict`] if the row changed since it was read,
/// [`DbError::NotFound`] if it no longer exists, or [`DbError::Sqlx`] if any
/// statement fails.
pub async fn update_partnership(
    pool: &PgPool,
    partnership: &Partnership,
    expected: PartnershipVersion,
    release_slot: bool,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE partnerships \
         SET agreed_rate = $1, deliverables = $2, status = $3, \
             content_submitted_at = $4, content_approved_at = $5, \
             payment_sent_at = $6, completed_at = $7, \
             brand_rates_creator = $8, creator_rates_brand = $9, \
             notes = $10, updated_at = $11 \
         WHERE id = $12 AND status = $13 AND updated_at = $14",
    )
    .bind(partnership.agreed_rate)
    .bind(Json(&partnership.deliverables))
    .bind(partnership.status.as_str())
    .bind(partnership.content_submitted_at)
    .bind(partnership.content_approved_at)
    .bind(partnership.payment_sent_at)
    .bind(partnership.completed_at)
    .bind(partnership.brand_rates_creator.map(i16::from))
    .bind(partnership.creator_rates_brand.map(i16::from))
    .bind(partnership.notes.as_deref())
    .bind(partnership.updated_at)
    .bind(partnership.id)
    .bind(expected.status.as_str())
    .bind(expected.updated_at)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM partnerships WHERE id = $1")
            .bind(partnership.id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        return Err(if exists {
            DbError::Conflict { id: partnership.id }
        } else {
            DbError::NotFound {
                entity: "partnership",
                id: partnership.id,
            }
        });
    }

    if release_slot {
        sqlx::query(
            "UPDATE creators \
             SET current_partnerships = GREATEST(current_partnerships - 1, 0), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(partnership.creator_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

async fn creator_exists(
    tx: &mut Transaction<'_, Postgres>,
    creator_id: Uuid,
) -> Result<bool, DbError> {
    let found = sqlx::query_scalar::<_, i32>("SELECT 1 FROM creators WHERE id = $1")
        .bind(creator_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(found.is_some())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Fetches a single partnership by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no partnership exists with the given id,
/// [`DbError::Decode`] for an unrecognised stored status, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn get_partnership(pool: &PgPool, partnership_id: Uuid) -> Result<Partnership, DbError> {
    let row = sqlx::query_as::<_, PartnershipRow>(&format!(
        "SELECT {PARTNERSHIP_COLUMNS} FROM partnerships WHERE id = $1"
    ))
    .bind(partnership_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound {
        entity: "partnership",
        id: partnership_id,
    })?;

    Partnership::try_from(row)
}

/// Returns partnerships matching every set field of `filter`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::Decode`] for
/// an unrecognised stored status.
pub async fn list_partnerships(
    pool: &PgPool,
    filter: &PartnershipFilter,
) -> Result<Vec<Partnership>, DbError> {
    let rows = sqlx::query_as::<_, PartnershipRow>(&format!(
        "SELECT {PARTNERSHIP_COLUMNS} FROM partnerships \
         WHERE ($1::uuid IS NULL OR brand_id = $1) \
           AND ($2::uuid IS NULL OR creator_id = $2) \
           AND ($3::text IS NULL OR status = $3) \
         ORDER BY created_at DESC, id"
    ))
    .bind(filter.brand_id)
    .bind(filter.creator_id)
    .bind(filter.status.map(PartnershipStatus::as_str))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Partnership::try_from).collect()
}
