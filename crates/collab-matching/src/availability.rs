//! Structural eligibility of a creator for a brief.

use collab_core::{Brief, CreatorProfile};
use rust_decimal::Decimal;

/// Brief-derived limits a creator must fit within to be considered at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityConstraints {
    pub budget_ceiling: Option<Decimal>,
    pub campaign_types: Vec<String>,
}

impl AvailabilityConstraints {
    #[must_use]
    pub fn from_brief(brief: &Brief) -> Self {
        Self {
            budget_ceiling: brief.budget_ceiling(),
            campaign_types: brief.campaign_types.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmetReason {
    NotSeeking,
    AtCapacity { current: i32, capacity: i32 },
    BudgetAboveCeiling { minimum: Decimal, ceiling: Decimal },
    CampaignTypeMismatch,
}

impl std::fmt::Display for UnmetReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmetReason::NotSeeking => write!(f, "not seeking partnerships"),
            UnmetReason::AtCapacity { current, capacity } => {
                write!(f, "at capacity ({current}/{capacity})")
            }
            UnmetReason::BudgetAboveCeiling { minimum, ceiling } => {
                write!(f, "minimum budget {minimum} exceeds ceiling {ceiling}")
            }
            UnmetReason::CampaignTypeMismatch => {
                write!(f, "no overlap with preferred campaign types")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    pub unmet: Vec<UnmetReason>,
}

/// Evaluate every availability rule and collect the ones that fail.
#[must_use]
pub fn check_availability(
    creator: &CreatorProfile,
    constraints: &AvailabilityConstraints,
) -> Availability {
    let mut unmet = Vec::new();

    if !creator.is_seeking {
        unmet.push(UnmetReason::NotSeeking);
    }

    if !creator.has_capacity() {
        unmet.push(UnmetReason::AtCapacity {
            current: creator.current_partnerships,
            capacity: creator.partnership_capacity,
        });
    }

    if let (Some(minimum), Some(ceiling)) = (creator.min_budget, constraints.budget_ceiling) {
        if minimum > ceiling {
            unmet.push(UnmetReason::BudgetAboveCeiling { minimum, ceiling });
        }
    }

    if !campaign_types_compatible(&creator.preferred_campaign_types, &constraints.campaign_types)
    {
        unmet.push(UnmetReason::CampaignTypeMismatch);
    }

    Availability {
        available: unmet.is_empty(),
        unmet,
    }
}

/// Whether a creator's type preferences admit a brief's requested types.
///
/// An empty list on either side places no restriction.
pub(crate) fn campaign_types_compatible(preferred: &[String], requested: &[String]) -> bool {
    if preferred.is_empty() || requested.is_empty() {
        return true;
    }
    preferred.iter().any(|p| {
        requested
            .iter()
            .any(|r| p.trim().eq_ignore_ascii_case(r.trim()))
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn creator() -> CreatorProfile {
        let mut c = CreatorProfile::new(Uuid::new_v4(), "Ana");
        c.min_budget = Some(Decimal::from(300));
        c.preferred_campaign_types = vec!["reel".to_string(), "post".to_string()];
        c
    }

    fn constraints() -> AvailabilityConstraints {
        AvailabilityConstraints {
            budget_ceiling: Some(Decimal::from(500)),
            campaign_types: vec!["Reel".to_string()],
        }
    }

    #[test]
    fn fully_eligible_creator_is_available() {
        let result = check_availability(&creator(), &constraints());
        assert!(result.available);
        assert!(result.unmet.is_empty());
    }

    #[test]
    fn every_failed_rule_is_reported() {
        let mut c = creator();
        c.is_seeking = false;
        c.current_partnerships = 3;
        c.min_budget = Some(Decimal::from(900));
        c.preferred_campaign_types = vec!["story".to_string()];

        let result = check_availability(&c, &constraints());
        assert!(!result.available);
        assert_eq!(
            result.unmet,
            vec![
                UnmetReason::NotSeeking,
                UnmetReason::AtCapacity {
                    current: 3,
                    capacity: 3
                },
                UnmetReason::BudgetAboveCeiling {
                    minimum: Decimal::from(900),
                    ceiling: Decimal::from(500)
                },
                UnmetReason::CampaignTypeMismatch,
            ]
        );
    }

    #[test]
    fn missing_budget_values_are_unconstrained() {
        let mut c = creator();
        c.min_budget = Some(Decimal::from(10_000));
        let open = AvailabilityConstraints {
            budget_ceiling: None,
            ..constraints()
        };
        assert!(check_availability(&c, &open).available);

        c.min_budget = None;
        assert!(check_availability(&c, &constraints()).available);
    }

    #[test]
    fn empty_preferences_accept_anything() {
        let mut c = creator();
        c.preferred_campaign_types.clear();
        assert!(check_availability(&c, &constraints()).available);
    }

    #[test]
    fn brief_without_types_places_no_restriction() {
        let open = AvailabilityConstraints {
            campaign_types: vec![],
            ..constraints()
        };
        assert!(check_availability(&creator(), &open).available);
    }

    #[test]
    fn unmet_reasons_render_for_logs() {
        let reason = UnmetReason::AtCapacity {
            current: 3,
            capacity: 3,
        };
        assert_eq!(reason.to_string(), "at capacity (3/3)");
    }
}
