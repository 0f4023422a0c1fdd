//! Store-backed partnership operations.
//!
//! Each write reads the partnership, applies a [`crate::lifecycle`] rule to
//! the copy, and writes it back conditioned on the `(status, updated_at)`
//! pair that was read. A concurrent writer makes the second write fail with
//! [`PartnershipError::Conflict`] instead of silently overwriting.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use collab_core::{
    Deliverable, HealthThresholds, NewPartnership, Partnership, PartnershipFilter,
    PartnershipStatus, PartnershipStore, PartnershipVersion, RatingTarget, RelayMetrics,
};
use uuid::Uuid;

use crate::error::PartnershipError;
use crate::health::{evaluate_health, PartnershipHealth};
use crate::lifecycle::{self, SlotEffect};

/// Create a partnership in `negotiating` and take one creator slot.
///
/// # Errors
///
/// Returns [`PartnershipError::Validation`] for a negative rate, a bad
/// deliverable list, or a match made for a different creator or brand,
/// [`PartnershipError::NotFound`] when `match_id` or the
/// creator is unknown, and [`PartnershipError::CapacityExceeded`] when the
/// creator is already at capacity.
pub async fn create_partnership<S: PartnershipStore>(
    store: &S,
    new: NewPartnership,
) -> Result<Partnership, PartnershipError> {
    lifecycle::validate_agreed_rate(new.agreed_rate)?;
    let deliverables = lifecycle::normalize_deliverables(new.deliverables)?;

    if let Some(match_id) = new.match_id {
        let record = store.get_match(match_id).await?;
        if record.result.creator_id != new.creator_id {
            return Err(PartnershipError::Validation(format!(
                "match {match_id} belongs to creator {}, not {}",
                record.result.creator_id, new.creator_id
            )));
        }
        let brief_brand = store.get_brief_brand_id(record.brief_id).await?;
        if brief_brand != new.brand_id {
            return Err(PartnershipError::Validation(format!(
                "match {match_id} belongs to brand {brief_brand}, not {}",
                new.brand_id
            )));
        }
    }

    let partnership = Partnership::from_new(
        NewPartnership {
            deliverables,
            ..new
        },
        timestamp(),
    );
    store.create_partnership(&partnership).await?;

    tracing::info!(
        partnership_id = %partnership.id,
        creator_id = %partnership.creator_id,
        brand_id = %partnership.brand_id,
        "partnership created"
    );
    Ok(partnership)
}

/// # Errors
///
/// Returns [`PartnershipError::NotFound`] for an unknown id.
pub async fn get_partnership<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
) -> Result<Partnership, PartnershipError> {
    Ok(store.get_partnership(partnership_id).await?)
}

/// # Errors
///
/// Returns [`PartnershipError::Persistence`] if the store read fails.
pub async fn list_partnerships<S: PartnershipStore>(
    store: &S,
    filter: &PartnershipFilter,
) -> Result<Vec<Partnership>, PartnershipError> {
    Ok(store.list_partnerships(filter).await?)
}

/// Move a partnership to `to`.
///
/// # Errors
///
/// Returns [`PartnershipError::InvalidTransition`] for a move the transition
/// table does not allow, [`PartnershipError::NotFound`] for an unknown id,
/// or [`PartnershipError::Conflict`] if the partnership changed concurrently.
pub async fn transition_status<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
    to: PartnershipStatus,
) -> Result<Partnership, PartnershipError> {
    apply(store, partnership_id, |p, now| lifecycle::transition(p, to, now)).await
}

/// # Errors
///
/// See [`transition_status`].
pub async fn submit_content<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
) -> Result<Partnership, PartnershipError> {
    apply(store, partnership_id, lifecycle::submit_content).await
}

/// # Errors
///
/// See [`transition_status`].
pub async fn approve_content<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
) -> Result<Partnership, PartnershipError> {
    apply(store, partnership_id, lifecycle::approve_content).await
}

/// # Errors
///
/// Returns [`PartnershipError::NotFound`] or [`PartnershipError::Conflict`].
pub async fn mark_payment_sent<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
) -> Result<Partnership, PartnershipError> {
    apply(store, partnership_id, |p, now| {
        lifecycle::mark_payment_sent(p, now);
        Ok(SlotEffect::Keep)
    })
    .await
}

/// Close a partnership under review, optionally recording both ratings.
///
/// # Errors
///
/// Returns [`PartnershipError::InvalidRating`] before anything is written if
/// a rating is outside 1..=5, otherwise as [`transition_status`].
pub async fn complete_partnership<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
    brand_rates_creator: Option<u8>,
    creator_rates_brand: Option<u8>,
) -> Result<Partnership, PartnershipError> {
    brand_rates_creator
        .map(lifecycle::validate_rating)
        .transpose()?;
    creator_rates_brand
        .map(lifecycle::validate_rating)
        .transpose()?;

    apply(store, partnership_id, |p, now| {
        lifecycle::complete(p, brand_rates_creator, creator_rates_brand, now)
    })
    .await
}

/// # Errors
///
/// Returns [`PartnershipError::InvalidRating`] for a value outside 1..=5.
pub async fn rate<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
    target: RatingTarget,
    value: u8,
) -> Result<Partnership, PartnershipError> {
    lifecycle::validate_rating(value)?;
    apply(store, partnership_id, |p, now| {
        lifecycle::rate(p, target, value, now)?;
        Ok(SlotEffect::Keep)
    })
    .await
}

/// Replace the deliverable list.
///
/// # Errors
///
/// Returns [`PartnershipError::Validation`] for a zero quantity or duplicate
/// ids.
pub async fn update_deliverables<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
    deliverables: Vec<Deliverable>,
) -> Result<Partnership, PartnershipError> {
    let deliverables = lifecycle::normalize_deliverables(deliverables)?;
    apply(store, partnership_id, |p, now| {
        lifecycle::replace_deliverables(p, deliverables, now)?;
        Ok(SlotEffect::Keep)
    })
    .await
}

/// Set one deliverable's completed count, clamped to its quantity.
///
/// # Errors
///
/// Returns [`PartnershipError::DeliverableNotFound`] for an unknown
/// deliverable id.
pub async fn mark_deliverable_complete<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
    deliverable_id: Uuid,
    completed: u32,
) -> Result<Partnership, PartnershipError> {
    apply(store, partnership_id, |p, now| {
        lifecycle::mark_deliverable_complete(p, deliverable_id, completed, now)?;
        Ok(SlotEffect::Keep)
    })
    .await
}

/// # Errors
///
/// Returns [`PartnershipError::NotFound`] or [`PartnershipError::Conflict`].
pub async fn update_notes<S: PartnershipStore>(
    store: &S,
    partnership_id: Uuid,
    notes: Option<&str>,
) -> Result<Partnership, PartnershipError> {
    apply(store, partnership_id, |p, now| {
        lifecycle::update_notes(p, notes, now);
        Ok(SlotEffect::Keep)
    })
    .await
}

/// Evaluate a partnership's health now.
///
/// A relay read failure is logged and treated as "no communication data".
///
/// # Errors
///
/// Returns [`PartnershipError::NotFound`] for an unknown id.
pub async fn get_partnership_health<S>(
    store: &S,
    partnership_id: Uuid,
    thresholds: &HealthThresholds,
) -> Result<PartnershipHealth, PartnershipError>
where
    S: PartnershipStore + RelayMetrics,
{
    let partnership = store.get_partnership(partnership_id).await?;
    let samples = match store.response_times(partnership_id).await {
        Ok(samples) => samples,
        Err(e) => {
            tracing::warn!(
                partnership_id = %partnership_id,
                error = %e,
                "relay metrics unavailable; evaluating health without communication data"
            );
            Vec::new()
        }
    };

    Ok(evaluate_health(&partnership, &samples, Utc::now(), thresholds))
}

/// Read, mutate, and conditionally write back one partnership.
async fn apply<S, F>(
    store: &S,
    partnership_id: Uuid,
    op: F,
) -> Result<Partnership, PartnershipError>
where
    S: PartnershipStore,
    F: FnOnce(&mut Partnership, DateTime<Utc>) -> Result<SlotEffect, PartnershipError>,
{
    let mut partnership = store.get_partnership(partnership_id).await?;
    let expected = PartnershipVersion::from(&partnership);
    let previous_status = partnership.status;

    let now = next_timestamp(expected.updated_at);
    let effect = op(&mut partnership, now)?;
    let release_slot = effect == SlotEffect::Release;

    store
        .update_partnership(&partnership, expected, release_slot)
        .await?;

    if partnership.status != previous_status {
        tracing::info!(
            partnership_id = %partnership.id,
            from = %previous_status,
            to = %partnership.status,
            "partnership status changed"
        );
    }
    if release_slot {
        tracing::info!(
            partnership_id = %partnership.id,
            creator_id = %partnership.creator_id,
            "creator partnership slot released"
        );
    }

    Ok(partnership)
}

/// Current time at the storage layer's microsecond precision.
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A write timestamp strictly after `previous`, so every successful write
/// changes the version it is guarded by.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    timestamp().max(previous + Duration::microseconds(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_timestamp_is_strictly_increasing() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_timestamp(future) > future);
        let past = Utc::now() - Duration::hours(1);
        assert!(next_timestamp(past) > past);
    }

    #[test]
    fn timestamps_have_microsecond_precision() {
        assert_eq!(timestamp().timestamp_subsec_nanos() % 1_000, 0);
    }
}
