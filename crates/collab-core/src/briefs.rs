use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// A brand's campaign specification used to find creators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub target_niches: Vec<String>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
    /// Minimum engagement rate as a percentage (`2.0` = 2%).
    pub min_engagement_rate: Option<f64>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub campaign_types: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

impl Brief {
    /// Check the structural invariants of a brief.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when a bound is negative or a
    /// min/max pair is inverted.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(min), Some(max)) = (self.min_followers, self.max_followers) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "brief {}: min_followers {min} exceeds max_followers {max}",
                    self.id
                )));
            }
        }

        if self.min_followers.is_some_and(|v| v < 0) || self.max_followers.is_some_and(|v| v < 0)
        {
            return Err(CoreError::Validation(format!(
                "brief {}: follower bounds must be non-negative",
                self.id
            )));
        }

        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "brief {}: budget_min {min} exceeds budget_max {max}",
                    self.id
                )));
            }
        }

        if self.budget_min.is_some_and(|v| v.is_sign_negative())
            || self.budget_max.is_some_and(|v| v.is_sign_negative())
        {
            return Err(CoreError::Validation(format!(
                "brief {}: budget bounds must be non-negative",
                self.id
            )));
        }

        if self
            .min_engagement_rate
            .is_some_and(|r| !r.is_finite() || r < 0.0)
        {
            return Err(CoreError::Validation(format!(
                "brief {}: min_engagement_rate must be a non-negative number",
                self.id
            )));
        }

        Ok(())
    }

    /// The budget ceiling used for availability and budget-fit checks.
    #[must_use]
    pub fn budget_ceiling(&self) -> Option<Decimal> {
        self.budget_max
    }

    /// Text sent to the embedding provider when no stored embedding exists.
    ///
    /// Blank fields are skipped; the order is fixed so the same brief always
    /// produces the same text.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        let mut push = |label: Option<&str>, value: &str| {
            let value = value.trim();
            if value.is_empty() {
                return;
            }
            match label {
                Some(label) => parts.push(format!("{label}: {value}")),
                None => parts.push(value.to_string()),
            }
        };

        push(None, &self.title);
        if let Some(description) = &self.description {
            push(None, description);
        }
        if let Some(product) = &self.product_name {
            push(Some("Product"), product);
        }
        if let Some(product_description) = &self.product_description {
            push(None, product_description);
        }
        push(Some("Niches"), &self.target_niches.join(", "));
        push(Some("Content types"), &self.campaign_types.join(", "));

        parts.join(". ")
    }
}
