//! In-process store with the same semantics as [`crate::PgStore`].
//!
//! Used by the test suites of the matching and partnership crates and by
//! anything that wants to exercise the engines without Postgres.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use collab_core::{
    Brief, CandidateFilter, CreatorProfile, MatchRecord, MatchingStore, Partnership,
    PartnershipFilter, PartnershipStore, PartnershipVersion, RelayMetrics, StoreError,
};
use uuid::Uuid;

#[derive(Debug, Default)]
struct State {
    brands: HashMap<Uuid, String>,
    briefs: HashMap<Uuid, Brief>,
    creators: HashMap<Uuid, CreatorProfile>,
    matches: Vec<MatchRecord>,
    partnerships: HashMap<Uuid, Partnership>,
    response_times: HashMap<Uuid, Vec<f64>>,
    fail_match_writes: bool,
    fail_embedding_writes: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_brand(&self, brand_id: Uuid, name: impl Into<String>) {
        self.lock().brands.insert(brand_id, name.into());
    }

    pub fn insert_brief(&self, brief: Brief) {
        self.lock().briefs.insert(brief.id, brief);
    }

    pub fn insert_creator(&self, creator: CreatorProfile) {
        self.lock().creators.insert(creator.id, creator);
    }

    pub fn insert_match(&self, record: MatchRecord) {
        self.lock().matches.push(record);
    }

    pub fn set_response_times(&self, partnership_id: Uuid, minutes: Vec<f64>) {
        self.lock().response_times.insert(partnership_id, minutes);
    }

    /// Make every subsequent `insert_matches` call fail without writing.
    pub fn fail_match_writes(&self, fail: bool) {
        self.lock().fail_match_writes = fail;
    }

    /// Make every subsequent `save_brief_embedding` call fail.
    pub fn fail_embedding_writes(&self, fail: bool) {
        self.lock().fail_embedding_writes = fail;
    }

    #[must_use]
    pub fn brief(&self, brief_id: Uuid) -> Option<Brief> {
        self.lock().briefs.get(&brief_id).cloned()
    }

    #[must_use]
    pub fn creator(&self, creator_id: Uuid) -> Option<CreatorProfile> {
        self.lock().creators.get(&creator_id).cloned()
    }

    /// Every stored match, in insertion order.
    #[must_use]
    pub fn all_matches(&self) -> Vec<MatchRecord> {
        self.lock().matches.clone()
    }
}

impl MatchingStore for MemoryStore {
    async fn get_brief(&self, brief_id: Uuid) -> Result<Brief, StoreError> {
        self.brief(brief_id).ok_or(StoreError::NotFound {
            entity: "brief",
            id: brief_id,
        })
    }

    async fn get_brand_name(&self, brand_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(self.lock().brands.get(&brand_id).cloned())
    }

    async fn save_brief_embedding(
        &self,
        brief_id: Uuid,
        embedding: &[f32],
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.fail_embedding_writes {
            return Err(StoreError::Backend("embedding write rejected".to_string()));
        }
        let brief = state.briefs.get_mut(&brief_id).ok_or(StoreError::NotFound {
            entity: "brief",
            id: brief_id,
        })?;
        brief.embedding = Some(embedding.to_vec());
        Ok(())
    }

    async fn list_candidate_creators(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<CreatorProfile>, StoreError> {
        let state = self.lock();
        let mut creators: Vec<CreatorProfile> = state
            .creators
            .values()
            .filter(|c| filter.admits(c))
            .cloned()
            .collect();
        creators.sort_by_key(|c| c.id);
        Ok(creators)
    }

    async fn insert_matches(&self, records: &[MatchRecord]) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.fail_match_writes {
            return Err(StoreError::Backend("match batch write rejected".to_string()));
        }
        state.matches.extend_from_slice(records);
        Ok(())
    }

    async fn list_matches(&self, brief_id: Uuid) -> Result<Vec<MatchRecord>, StoreError> {
        let mut matches: Vec<MatchRecord> = self
            .lock()
            .matches
            .iter()
            .filter(|m| m.brief_id == brief_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.result
                .hybrid_score
                .cmp(&a.result.hybrid_score)
                .then_with(|| b.result.rule_score.cmp(&a.result.rule_score))
                .then_with(|| a.result.creator_id.cmp(&b.result.creator_id))
        });
        Ok(matches)
    }
}

impl PartnershipStore for MemoryStore {
    async fn get_match(&self, match_id: Uuid) -> Result<MatchRecord, StoreError> {
        self.lock()
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "match",
                id: match_id,
            })
    }

    async fn get_brief_brand_id(&self, brief_id: Uuid) -> Result<Uuid, StoreError> {
        self.lock()
            .briefs
            .get(&brief_id)
            .map(|b| b.brand_id)
            .ok_or(StoreError::NotFound {
                entity: "brief",
                id: brief_id,
            })
    }

    async fn create_partnership(&self, partnership: &Partnership) -> Result<(), StoreError> {
        let mut state = self.lock();
        if state.partnerships.contains_key(&partnership.id) {
            return Err(StoreError::Conflict(format!(
                "partnership {} already exists",
                partnership.id
            )));
        }
        let creator = state
            .creators
            .get_mut(&partnership.creator_id)
            .ok_or(StoreError::NotFound {
                entity: "creator",
                id: partnership.creator_id,
            })?;
        if !creator.has_capacity() {
            return Err(StoreError::CapacityExceeded {
                creator_id: partnership.creator_id,
            });
        }
        creator.current_partnerships += 1;
        state
            .partnerships
            .insert(partnership.id, partnership.clone());
        Ok(())
    }

    async fn get_partnership(&self, partnership_id: Uuid) -> Result<Partnership, StoreError> {
        self.lock()
            .partnerships
            .get(&partnership_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "partnership",
                id: partnership_id,
            })
    }

    async fn update_partnership(
        &self,
        partnership: &Partnership,
        expected: PartnershipVersion,
        release_slot: bool,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        let stored = state
            .partnerships
            .get_mut(&partnership.id)
            .ok_or(StoreError::NotFound {
                entity: "partnership",
                id: partnership.id,
            })?;
        if PartnershipVersion::from(&*stored) != expected {
            return Err(StoreError::Conflict(format!(
                "partnership {} was modified concurrently",
                partnership.id
            )));
        }
        *stored = partnership.clone();

        if release_slot {
            if let Some(creator) = state.creators.get_mut(&partnership.creator_id) {
                creator.current_partnerships = (creator.current_partnerships - 1).max(0);
            }
        }
        Ok(())
    }

    async fn list_partnerships(
        &self,
        filter: &PartnershipFilter,
    ) -> Result<Vec<Partnership>, StoreError> {
        let mut partnerships: Vec<Partnership> = self
            .lock()
            .partnerships
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        partnerships.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(partnerships)
    }
}

impl RelayMetrics for MemoryStore {
    async fn response_times(&self, partnership_id: Uuid) -> Result<Vec<f64>, StoreError> {
        Ok(self
            .lock()
            .response_times
            .get(&partnership_id)
            .cloned()
            .unwrap_or_default())
    }
}
