use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnershipStatus {
    Negotiating,
    Active,
    ContentPending,
    Review,
    Completed,
    Cancelled,
}

impl PartnershipStatus {
    pub const ALL: [PartnershipStatus; 6] = [
        PartnershipStatus::Negotiating,
        PartnershipStatus::Active,
        PartnershipStatus::ContentPending,
        PartnershipStatus::Review,
        PartnershipStatus::Completed,
        PartnershipStatus::Cancelled,
    ];

    /// States reachable from `self` in a single transition.
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [PartnershipStatus] {
        use PartnershipStatus::{Active, Cancelled, Completed, ContentPending, Negotiating, Review};
        match self {
            Negotiating => &[Active, Cancelled],
            Active => &[ContentPending, Cancelled],
            ContentPending => &[Review, Active, Cancelled],
            Review => &[Completed, ContentPending, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: PartnershipStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PartnershipStatus::Completed | PartnershipStatus::Cancelled
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PartnershipStatus::Negotiating => "negotiating",
            PartnershipStatus::Active => "active",
            PartnershipStatus::ContentPending => "content_pending",
            PartnershipStatus::Review => "review",
            PartnershipStatus::Completed => "completed",
            PartnershipStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PartnershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PartnershipStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartnershipStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "partnership status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverableType {
    Post,
    Story,
    Reel,
    Ugc,
    Other,
}

impl std::str::FromStr for DeliverableType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "post" => Ok(DeliverableType::Post),
            "story" => Ok(DeliverableType::Story),
            "reel" => Ok(DeliverableType::Reel),
            "ugc" => Ok(DeliverableType::Ugc),
            "other" => Ok(DeliverableType::Other),
            other => Err(CoreError::UnknownVariant {
                kind: "deliverable type",
                value: other.to_string(),
            }),
        }
    }
}

/// One unit of contracted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: DeliverableType,
    pub description: Option<String>,
    pub quantity: u32,
    pub completed: u32,
    pub due_date: Option<NaiveDate>,
}

impl Deliverable {
    #[must_use]
    pub fn new(kind: DeliverableType, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            description: None,
            quantity,
            completed: 0,
            due_date: None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed >= self.quantity
    }

    /// Past its due date with units still outstanding.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < today) && !self.is_complete()
    }
}

/// Which side of the partnership a rating is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTarget {
    /// The brand's rating of the creator.
    BrandRatesCreator,
    /// The creator's rating of the brand.
    CreatorRatesBrand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partnership {
    pub id: Uuid,
    pub match_id: Option<Uuid>,
    pub brand_id: Uuid,
    pub creator_id: Uuid,
    pub agreed_rate: Option<Decimal>,
    pub deliverables: Vec<Deliverable>,
    pub status: PartnershipStatus,
    pub content_submitted_at: Option<DateTime<Utc>>,
    pub content_approved_at: Option<DateTime<Utc>>,
    pub payment_sent_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub brand_rates_creator: Option<u8>,
    pub creator_rates_brand: Option<u8>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partnership {
    /// Build a fresh partnership in `negotiating` status.
    #[must_use]
    pub fn from_new(new: NewPartnership, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id: new.match_id,
            brand_id: new.brand_id,
            creator_id: new.creator_id,
            agreed_rate: new.agreed_rate,
            deliverables: new.deliverables,
            status: PartnershipStatus::Negotiating,
            content_submitted_at: None,
            content_approved_at: None,
            payment_sent_at: None,
            completed_at: None,
            brand_rates_creator: None,
            creator_rates_brand: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a partnership.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPartnership {
    pub match_id: Option<Uuid>,
    pub brand_id: Uuid,
    pub creator_id: Uuid,
    pub agreed_rate: Option<Decimal>,
    pub deliverables: Vec<Deliverable>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartnershipFilter {
    pub brand_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
    pub status: Option<PartnershipStatus>,
}

impl PartnershipFilter {
    #[must_use]
    pub fn matches(&self, partnership: &Partnership) -> bool {
        self.brand_id.is_none_or(|id| id == partnership.brand_id)
            && self.creator_id.is_none_or(|id| id == partnership.creator_id)
            && self.status.is_none_or(|s| s == partnership.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_exits() {
        for status in PartnershipStatus::ALL {
            assert_eq!(
                status.is_terminal(),
                status.allowed_transitions().is_empty(),
                "{status}"
            );
        }
    }

    #[test]
    fn every_non_terminal_state_can_cancel() {
        for status in PartnershipStatus::ALL {
            if !status.is_terminal() {
                assert!(status.can_transition_to(PartnershipStatus::Cancelled));
            }
        }
    }

    #[test]
    fn transition_table_matches_workflow() {
        use PartnershipStatus::{Active, Cancelled, Completed, ContentPending, Negotiating, Review};
        let allowed = [
            (Negotiating, Active),
            (Negotiating, Cancelled),
            (Active, ContentPending),
            (Active, Cancelled),
            (ContentPending, Review),
            (ContentPending, Active),
            (ContentPending, Cancelled),
            (Review, Completed),
            (Review, ContentPending),
            (Review, Cancelled),
        ];
        for from in PartnershipStatus::ALL {
            for to in PartnershipStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in PartnershipStatus::ALL {
            assert_eq!(status.as_str().parse::<PartnershipStatus>().unwrap(), status);
        }
        assert!("paused".parse::<PartnershipStatus>().is_err());
    }

    #[test]
    fn deliverable_serializes_kind_as_type() {
        let d = Deliverable::new(DeliverableType::Reel, 2);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], serde_json::json!("reel"));
        assert_eq!(json["quantity"], serde_json::json!(2));
    }

    #[test]
    fn overdue_requires_past_due_and_outstanding_units() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut d = Deliverable::new(DeliverableType::Post, 2);
        assert!(!d.is_overdue(today));

        d.due_date = NaiveDate::from_ymd_opt(2026, 3, 9);
        assert!(d.is_overdue(today));

        d.completed = 2;
        assert!(!d.is_overdue(today));

        d.completed = 0;
        d.due_date = Some(today);
        assert!(!d.is_overdue(today), "due today is not overdue yet");
    }

    #[test]
    fn filter_matches_on_all_set_fields() {
        let now = Utc::now();
        let p = Partnership::from_new(
            NewPartnership {
                match_id: None,
                brand_id: Uuid::new_v4(),
                creator_id: Uuid::new_v4(),
                agreed_rate: None,
                deliverables: vec![],
            },
            now,
        );
        assert!(PartnershipFilter::default().matches(&p));
        assert!(PartnershipFilter {
            brand_id: Some(p.brand_id),
            status: Some(PartnershipStatus::Negotiating),
            ..Default::default()
        }
        .matches(&p));
        assert!(!PartnershipFilter {
            creator_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
        .matches(&p));
    }
}
