//! Pure state-machine rules for a single partnership.
//!
//! Every function validates before it mutates: on error the partnership is
//! left exactly as it was. Each successful call stamps `updated_at = now`.

use chrono::{DateTime, Utc};
use collab_core::{Deliverable, Partnership, PartnershipStatus, RatingTarget};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::PartnershipError;

/// What an operation means for the creator's capacity slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEffect {
    Keep,
    /// The partnership entered a terminal state; the slot must be freed.
    Release,
}

/// Move a partnership to `to` if the transition table allows it.
///
/// Entering `completed` stamps `completed_at`. Entering either terminal
/// state yields [`SlotEffect::Release`]; terminal states have no exits, so
/// this happens at most once per partnership.
///
/// # Errors
///
/// Returns [`PartnershipError::InvalidTransition`] for any move the table
/// does not list, including moves out of a terminal state.
pub fn transition(
    partnership: &mut Partnership,
    to: PartnershipStatus,
    now: DateTime<Utc>,
) -> Result<SlotEffect, PartnershipError> {
    let from = partnership.status;
    if !from.can_transition_to(to) {
        return Err(PartnershipError::InvalidTransition { from, to });
    }

    partnership.status = to;
    if to == PartnershipStatus::Completed {
        partnership.completed_at.get_or_insert(now);
    }
    partnership.updated_at = now;

    Ok(if to.is_terminal() {
        SlotEffect::Release
    } else {
        SlotEffect::Keep
    })
}

/// Creator hands in content: move to `content_pending`.
///
/// # Errors
///
/// Returns [`PartnershipError::InvalidTransition`] unless the partnership is
/// `active` or `review`.
pub fn submit_content(
    partnership: &mut Partnership,
    now: DateTime<Utc>,
) -> Result<SlotEffect, PartnershipError> {
    let effect = transition(partnership, PartnershipStatus::ContentPending, now)?;
    partnership.content_submitted_at.get_or_insert(now);
    Ok(effect)
}

/// Brand signs off on submitted content: move to `review`.
///
/// # Errors
///
/// Returns [`PartnershipError::InvalidTransition`] unless the partnership is
/// `content_pending`.
pub fn approve_content(
    partnership: &mut Partnership,
    now: DateTime<Utc>,
) -> Result<SlotEffect, PartnershipError> {
    let effect = transition(partnership, PartnershipStatus::Review, now)?;
    partnership.content_approved_at.get_or_insert(now);
    Ok(effect)
}

/// Record that payment went out. Allowed in any status; the first stamp wins.
pub fn mark_payment_sent(partnership: &mut Partnership, now: DateTime<Utc>) {
    partnership.payment_sent_at.get_or_insert(now);
    partnership.updated_at = now;
}

/// Close a partnership in `review` with optional ratings from each side.
///
/// Ratings are validated before anything changes.
///
/// # Errors
///
/// Returns [`PartnershipError::InvalidRating`] for a rating outside 1..=5,
/// or [`PartnershipError::InvalidTransition`] unless the partnership is in
/// `review`.
pub fn complete(
    partnership: &mut Partnership,
    brand_rates_creator: Option<u8>,
    creator_rates_brand: Option<u8>,
    now: DateTime<Utc>,
) -> Result<SlotEffect, PartnershipError> {
    let brand_rating = brand_rates_creator.map(validate_rating).transpose()?;
    let creator_rating = creator_rates_brand.map(validate_rating).transpose()?;

    let effect = transition(partnership, PartnershipStatus::Completed, now)?;
    if brand_rating.is_some() {
        partnership.brand_rates_creator = brand_rating;
    }
    if creator_rating.is_some() {
        partnership.creator_rates_brand = creator_rating;
    }
    Ok(effect)
}

/// Set one side's rating. Allowed in any status.
///
/// # Errors
///
/// Returns [`PartnershipError::InvalidRating`] for a value outside 1..=5.
pub fn rate(
    partnership: &mut Partnership,
    target: RatingTarget,
    value: u8,
    now: DateTime<Utc>,
) -> Result<(), PartnershipError> {
    let value = validate_rating(value)?;
    match target {
        RatingTarget::BrandRatesCreator => partnership.brand_rates_creator = Some(value),
        RatingTarget::CreatorRatesBrand => partnership.creator_rates_brand = Some(value),
    }
    partnership.updated_at = now;
    Ok(())
}

/// # Errors
///
/// Returns [`PartnershipError::InvalidRating`] unless `value` is in 1..=5.
pub fn validate_rating(value: u8) -> Result<u8, PartnershipError> {
    if (1..=5).contains(&value) {
        Ok(value)
    } else {
        Err(PartnershipError::InvalidRating(value))
    }
}

/// Check a deliverable list and clamp every `completed` count to its
/// `quantity`.
///
/// # Errors
///
/// Returns [`PartnershipError::Validation`] for a zero quantity or a
/// duplicated deliverable id.
pub fn normalize_deliverables(
    mut deliverables: Vec<Deliverable>,
) -> Result<Vec<Deliverable>, PartnershipError> {
    let mut seen: Vec<Uuid> = Vec::with_capacity(deliverables.len());
    for deliverable in &mut deliverables {
        if deliverable.quantity == 0 {
            return Err(PartnershipError::Validation(format!(
                "deliverable {} must have a quantity above zero",
                deliverable.id
            )));
        }
        if seen.contains(&deliverable.id) {
            return Err(PartnershipError::Validation(format!(
                "duplicate deliverable id {}",
                deliverable.id
            )));
        }
        seen.push(deliverable.id);
        deliverable.completed = deliverable.completed.min(deliverable.quantity);
    }
    Ok(deliverables)
}

/// Replace the whole deliverable list. Allowed in any status.
///
/// # Errors
///
/// See [`normalize_deliverables`].
pub fn replace_deliverables(
    partnership: &mut Partnership,
    deliverables: Vec<Deliverable>,
    now: DateTime<Utc>,
) -> Result<(), PartnershipError> {
    partnership.deliverables = normalize_deliverables(deliverables)?;
    partnership.updated_at = now;
    Ok(())
}

/// Set the completed count of one deliverable, clamped to its quantity.
///
/// # Errors
///
/// Returns [`PartnershipError::DeliverableNotFound`] for an unknown id.
pub fn mark_deliverable_complete(
    partnership: &mut Partnership,
    deliverable_id: Uuid,
    completed: u32,
    now: DateTime<Utc>,
) -> Result<(), PartnershipError> {
    let partnership_id = partnership.id;
    let deliverable = partnership
        .deliverables
        .iter_mut()
        .find(|d| d.id == deliverable_id)
        .ok_or(PartnershipError::DeliverableNotFound {
            partnership_id,
            deliverable_id,
        })?;
    deliverable.completed = completed.min(deliverable.quantity);
    partnership.updated_at = now;
    Ok(())
}

/// Replace the free-text notes. Blank text clears them.
pub fn update_notes(partnership: &mut Partnership, notes: Option<&str>, now: DateTime<Utc>) {
    partnership.notes = notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToString::to_string);
    partnership.updated_at = now;
}

/// # Errors
///
/// Returns [`PartnershipError::Validation`] for a negative rate.
pub fn validate_agreed_rate(rate: Option<Decimal>) -> Result<(), PartnershipError> {
    match rate {
        Some(r) if r.is_sign_negative() && !r.is_zero() => Err(PartnershipError::Validation(
            format!("agreed rate must not be negative, got {r}"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod tests;
