//! Storage seams for the matching engine and the partnership lifecycle.
//!
//! Both subsystems are written against these traits; `collab-db` provides the
//! Postgres and in-memory implementations.

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    Brief, CreatorProfile, MatchRecord, Partnership, PartnershipFilter, PartnershipStatus,
    StoreError,
};

/// Pre-scoring bounds applied by the store when fetching the candidate pool.
///
/// Seeking and spare capacity are always required; the remaining fields are
/// only applied when set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    pub budget_ceiling: Option<Decimal>,
    /// Lowercased campaign types requested by the brief.
    pub campaign_types: Vec<String>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
    pub min_engagement_rate: Option<f64>,
}

impl CandidateFilter {
    /// In-process equivalent of the store-side pre-filter.
    #[must_use]
    pub fn admits(&self, creator: &CreatorProfile) -> bool {
        if !creator.is_seeking || !creator.has_capacity() {
            return false;
        }
        if let (Some(ceiling), Some(minimum)) = (self.budget_ceiling, creator.min_budget) {
            if minimum > ceiling {
                return false;
            }
        }
        if !self.campaign_types.is_empty()
            && !creator.preferred_campaign_types.is_empty()
            && !creator
                .preferred_campaign_types
                .iter()
                .any(|t| self.campaign_types.contains(&t.trim().to_lowercase()))
        {
            return false;
        }
        if self.min_followers.is_some_and(|min| creator.follower_count < min) {
            return false;
        }
        if self.max_followers.is_some_and(|max| creator.follower_count > max) {
            return false;
        }
        if self
            .min_engagement_rate
            .is_some_and(|min| creator.engagement_rate < min)
        {
            return false;
        }
        true
    }
}

/// Snapshot of the fields a partnership write is conditioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnershipVersion {
    pub status: PartnershipStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<&Partnership> for PartnershipVersion {
    fn from(p: &Partnership) -> Self {
        Self {
            status: p.status,
            updated_at: p.updated_at,
        }
    }
}

pub trait MatchingStore: Send + Sync {
    fn get_brief(&self, brief_id: Uuid) -> impl Future<Output = Result<Brief, StoreError>> + Send;

    /// Display name of a brand, used for dream-brand checks.
    fn get_brand_name(
        &self,
        brand_id: Uuid,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn save_brief_embedding(
        &self,
        brief_id: Uuid,
        embedding: &[f32],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_candidate_creators(
        &self,
        filter: &CandidateFilter,
    ) -> impl Future<Output = Result<Vec<CreatorProfile>, StoreError>> + Send;

    /// Persist a whole matching run. Either every record is written or none is.
    fn insert_matches(
        &self,
        records: &[MatchRecord],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Matches for a brief, best first.
    fn list_matches(
        &self,
        brief_id: Uuid,
    ) -> impl Future<Output = Result<Vec<MatchRecord>, StoreError>> + Send;
}

pub trait PartnershipStore: Send + Sync {
    fn get_match(
        &self,
        match_id: Uuid,
    ) -> impl Future<Output = Result<MatchRecord, StoreError>> + Send;

    /// Brand that owns a brief.
    fn get_brief_brand_id(
        &self,
        brief_id: Uuid,
    ) -> impl Future<Output = Result<Uuid, StoreError>> + Send;

    /// Insert a partnership and take one of the creator's capacity slots.
    ///
    /// The slot is taken with a guarded atomic increment in the same
    /// transaction as the insert; a full creator yields
    /// [`StoreError::CapacityExceeded`] and nothing is written.
    fn create_partnership(
        &self,
        partnership: &Partnership,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_partnership(
        &self,
        partnership_id: Uuid,
    ) -> impl Future<Output = Result<Partnership, StoreError>> + Send;

    /// Overwrite a partnership if it still matches `expected`.
    ///
    /// A concurrent write makes this fail with [`StoreError::Conflict`].
    /// When `release_slot` is set the creator's counter is decremented in the
    /// same transaction.
    fn update_partnership(
        &self,
        partnership: &Partnership,
        expected: PartnershipVersion,
        release_slot: bool,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_partnerships(
        &self,
        filter: &PartnershipFilter,
    ) -> impl Future<Output = Result<Vec<Partnership>, StoreError>> + Send;
}

/// Response-time samples from the message relay.
pub trait RelayMetrics: Send + Sync {
    /// Response times in minutes. An empty list means no data.
    fn response_times(
        &self,
        partnership_id: Uuid,
    ) -> impl Future<Output = Result<Vec<f64>, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> CreatorProfile {
        let mut c = CreatorProfile::new(Uuid::new_v4(), "Ana");
        c.follower_count = 50_000;
        c.engagement_rate = 3.0;
        c.min_budget = Some(Decimal::from(300));
        c.preferred_campaign_types = vec!["Reel".to_string(), "post".to_string()];
        c
    }

    #[test]
    fn empty_filter_admits_available_creator() {
        assert!(CandidateFilter::default().admits(&creator()));
    }

    #[test]
    fn filter_rejects_non_seeking_and_full_creators() {
        let mut c = creator();
        c.is_seeking = false;
        assert!(!CandidateFilter::default().admits(&c));

        let mut c = creator();
        c.current_partnerships = c.partnership_capacity;
        assert!(!CandidateFilter::default().admits(&c));
    }

    #[test]
    fn filter_applies_budget_types_and_audience_bounds() {
        let filter = CandidateFilter {
            budget_ceiling: Some(Decimal::from(500)),
            campaign_types: vec!["reel".to_string()],
            min_followers: Some(8_000),
            max_followers: Some(120_000),
            min_engagement_rate: Some(1.6),
        };
        assert!(filter.admits(&creator()));

        let mut pricey = creator();
        pricey.min_budget = Some(Decimal::from(600));
        assert!(!filter.admits(&pricey));

        let mut story_only = creator();
        story_only.preferred_campaign_types = vec!["story".to_string()];
        assert!(!filter.admits(&story_only));

        let mut small = creator();
        small.follower_count = 1_000;
        assert!(!filter.admits(&small));
    }
}
