use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tuning::TierThresholds;
use crate::CoreError;

/// Which matching criteria a creator satisfied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReasons {
    pub niche_match: bool,
    pub follower_match: bool,
    pub engagement_match: bool,
    pub budget_match: bool,
    pub campaign_type_match: bool,
    pub semantic_match: bool,
    pub dream_brand_match: bool,
}

/// Score of one creator against one brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub creator_id: Uuid,
    pub hybrid_score: u8,
    pub semantic_score: u8,
    pub rule_score: u8,
    pub reasons: MatchReasons,
    pub is_dream_brand: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Fair,
    Good,
    Great,
    Golden,
}

impl MatchTier {
    #[must_use]
    pub fn for_score(score: u8, thresholds: &TierThresholds) -> Self {
        if score >= thresholds.golden {
            MatchTier::Golden
        } else if score >= thresholds.great {
            MatchTier::Great
        } else if score >= thresholds.good {
            MatchTier::Good
        } else {
            MatchTier::Fair
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::Fair => "fair",
            MatchTier::Good => "good",
            MatchTier::Great => "great",
            MatchTier::Golden => "golden",
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fair" => Ok(MatchTier::Fair),
            "good" => Ok(MatchTier::Good),
            "great" => Ok(MatchTier::Great),
            "golden" => Ok(MatchTier::Golden),
            other => Err(CoreError::UnknownVariant {
                kind: "match tier",
                value: other.to_string(),
            }),
        }
    }
}

/// The creator's answer to a surfaced match. Written by the opportunity
/// workflow, never by the matching engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatorResponse {
    Pending,
    Accepted,
    Declined,
}

impl CreatorResponse {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CreatorResponse::Pending => "pending",
            CreatorResponse::Accepted => "accepted",
            CreatorResponse::Declined => "declined",
        }
    }
}

impl std::fmt::Display for CreatorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CreatorResponse {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CreatorResponse::Pending),
            "accepted" => Ok(CreatorResponse::Accepted),
            "declined" => Ok(CreatorResponse::Declined),
            other => Err(CoreError::UnknownVariant {
                kind: "creator response",
                value: other.to_string(),
            }),
        }
    }
}

/// A persisted match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub brief_id: Uuid,
    pub result: MatchResult,
    pub tier: MatchTier,
    pub creator_response: CreatorResponse,
    pub created_at: DateTime<Utc>,
}
