//! Response-time samples recorded by the message relay.

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Returns every recorded response time for a partnership, in minutes,
/// oldest first. An empty list means the relay has no data.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn response_times(pool: &PgPool, partnership_id: Uuid) -> Result<Vec<f64>, DbError> {
    let samples = sqlx::query_scalar::<_, f64>(
        "SELECT response_minutes FROM relay_response_samples \
         WHERE partnership_id = $1 \
         ORDER BY recorded_at, id",
    )
    .bind(partnership_id)
    .fetch_all(pool)
    .await?;

    Ok(samples)
}
