//! Postgres implementation of the storage traits.

use collab_core::{
    Brief, CandidateFilter, CreatorProfile, MatchRecord, MatchingStore, Partnership,
    PartnershipFilter, PartnershipStore, PartnershipVersion, RelayMetrics, StoreError,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Pool-backed store handed to the matching engine and the partnership
/// service.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl MatchingStore for PgStore {
    async fn get_brief(&self, brief_id: Uuid) -> Result<Brief, StoreError> {
        Ok(crate::briefs::get_brief(&self.pool, brief_id).await?)
    }

    async fn get_brand_name(&self, brand_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(crate::brands::get_brand_name(&self.pool, brand_id).await?)
    }

    async fn save_brief_embedding(
        &self,
        brief_id: Uuid,
        embedding: &[f32],
    ) -> Result<(), StoreError> {
        Ok(crate::briefs::save_brief_embedding(&self.pool, brief_id, embedding).await?)
    }

    async fn list_candidate_creators(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CreatorProfile>, StoreError> {
        Ok(crate::creators::list_candidate_creators(&self.pool, filter).await?)
    }

    async fn insert_matches(&self, records: &[MatchRecord]) -> Result<(), StoreError> {
        Ok(crate::matches::insert_matches(&self.pool, records).await?)
    }

    async fn list_matches(&self, brief_id: Uuid) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(crate::matches::list_matches(&self.pool, brief_id).await?)
    }
}

impl PartnershipStore for PgStore {
    async fn get_match(&self, match_id: Uuid) -> Result<MatchRecord, StoreError> {
        Ok(crate::matches::get_match(&self.pool, match_id).await?)
    }

    async fn get_brief_brand_id(&self, brief_id: Uuid) -> Result<Uuid, StoreError> {
        Ok(crate::briefs::get_brief_brand_id(&self.pool, brief_id).await?)
    }

    async fn create_partnership(&self, partnership: &Partnership) -> Result<(), StoreError> {
        Ok(crate::partnerships::insert_partnership(&self.pool, partnership).await?)
    }

    async fn get_partnership(&self, partnership_id: Uuid) -> Result<Partnership, StoreError> {
        Ok(crate::partnerships::get_partnership(&self.pool, partnership_id).await?)
    }

    async fn update_partnership(
        &self,
        partnership: &Partnership,
        expected: PartnershipVersion,
        release_slot: bool,
    ) -> Result<(), StoreError> {
        Ok(
            crate::partnerships::update_partnership(&self.pool, partnership, expected, release_slot)
                .await?,
        )
    }

    async fn list_partnerships(
        &self,
        filter: &PartnershipFilter,
    ) -> Result<Vec<Partnership>, StoreError> {
        Ok(crate::partnerships::list_partnerships(&self.pool, filter).await?)
    }
}

impl RelayMetrics for PgStore {
    async fn response_times(&self, partnership_id: Uuid) -> Result<Vec<f64>, StoreError> {
        Ok(crate::relay::response_times(&self.pool, partnership_id).await?)
    }
}
