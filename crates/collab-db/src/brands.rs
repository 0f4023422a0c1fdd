//! Database operations for the `brands` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Returns the display name of a brand, or `None` if the brand is unknown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_name(pool: &PgPool, brand_id: Uuid) -> Result<Option<String>, DbError> {
    let name = sqlx::query_scalar::<_, String>("SELECT name FROM brands WHERE id = $1")
        .bind(brand_id)
        .fetch_optional(pool)
        .await?;

    Ok(name)
}
