use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum concurrent partnerships a creator takes on unless they say otherwise.
pub const DEFAULT_PARTNERSHIP_CAPACITY: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    pub id: Uuid,
    pub display_name: String,
    pub niche: Option<String>,
    pub follower_count: i64,
    /// Engagement rate as a percentage (`3.0` = 3%).
    pub engagement_rate: f64,
    pub is_seeking: bool,
    pub partnership_capacity: i32,
    pub current_partnerships: i32,
    pub min_budget: Option<Decimal>,
    /// Empty means the creator accepts any campaign type.
    pub preferred_campaign_types: Vec<String>,
    pub dream_brands: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

impl CreatorProfile {
    /// A seeking creator with default capacity and no constraints.
    #[must_use]
    pub fn new(id: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            niche: None,
            follower_count: 0,
            engagement_rate: 0.0,
            is_seeking: true,
            partnership_capacity: DEFAULT_PARTNERSHIP_CAPACITY,
            current_partnerships: 0,
            min_budget: None,
            preferred_campaign_types: Vec::new(),
            dream_brands: Vec::new(),
            embedding: None,
        }
    }

    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.current_partnerships < self.partnership_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creator_uses_default_capacity() {
        let creator = CreatorProfile::new(Uuid::new_v4(), "Ana");
        assert_eq!(creator.partnership_capacity, 3);
        assert!(creator.is_seeking);
        assert!(creator.has_capacity());
    }

    #[test]
    fn full_creator_has_no_capacity() {
        let mut creator = CreatorProfile::new(Uuid::new_v4(), "Ana");
        creator.current_partnerships = 3;
        assert!(!creator.has_capacity());
    }
}
