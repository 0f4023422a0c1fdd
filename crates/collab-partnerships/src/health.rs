//! Qualitative partnership health from timing, progress and relay data.

use chrono::{DateTime, Utc};
use collab_core::{HealthThresholds, Partnership, PartnershipStatus};
use serde::Serialize;
use uuid::Uuid;

/// Health classification, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    NeedsAttention,
    AtRisk,
}

impl HealthStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::NeedsAttention => "needs_attention",
            HealthStatus::AtRisk => "at_risk",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnershipHealthMetrics {
    /// Whole days since the partnership was created.
    pub days_active: i64,
    /// Percentage of contracted units delivered, 0 with no deliverables.
    pub deliverable_progress: u8,
    pub overdue_deliverables: usize,
    /// `Some(true)` when no dated deliverable is overdue; `None` when nothing
    /// carries a due date.
    pub on_time_delivery: Option<bool>,
    /// 0–100 from the relay's average response time; `None` without samples.
    pub communication_score: Option<u8>,
    pub avg_response_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnershipHealth {
    pub partnership_id: Uuid,
    pub status: HealthStatus,
    pub metrics: PartnershipHealthMetrics,
    pub reasons: Vec<String>,
}

/// Evaluate health at `now`.
///
/// `response_minutes` are the relay's response-time samples; pass an empty
/// slice when there are none.
#[must_use]
pub fn evaluate_health(
    partnership: &Partnership,
    response_minutes: &[f64],
    now: DateTime<Utc>,
    thresholds: &HealthThresholds,
) -> PartnershipHealth {
    let today = now.date_naive();
    let days_active = (now - partnership.created_at).num_days().max(0);
    let deliverable_progress = progress_percent(partnership);

    let overdue = partnership
        .deliverables
        .iter()
        .filter(|d| d.is_overdue(today))
        .count();
    let has_due_dates = partnership.deliverables.iter().any(|d| d.due_date.is_some());
    let on_time_delivery = has_due_dates.then_some(overdue == 0);

    let avg_response_minutes = average(response_minutes);
    let raw_communication = avg_response_minutes.map(raw_communication_score);
    let communication_score = raw_communication.map(round_score);

    let mut status = HealthStatus::Healthy;
    let mut reasons = Vec::new();
    let mut flag = |severity: HealthStatus, reason: String| {
        status = status.max(severity);
        reasons.push(reason);
    };

    if overdue > 0 {
        flag(
            HealthStatus::AtRisk,
            format!("{overdue} overdue deliverable(s)"),
        );
    }

    match partnership.status {
        PartnershipStatus::Negotiating if days_active > thresholds.negotiation_stall_days => {
            flag(
                HealthStatus::NeedsAttention,
                format!("Negotiation open for {days_active} days"),
            );
        }
        PartnershipStatus::Active
            if days_active > thresholds.execution_stall_days
                && deliverable_progress < thresholds.execution_min_progress =>
        {
            flag(
                HealthStatus::AtRisk,
                format!(
                    "Only {deliverable_progress}% of deliverables complete after {days_active} days"
                ),
            );
        }
        PartnershipStatus::ContentPending => {
            if let Some(submitted) = partnership.content_submitted_at {
                let waiting = (now - submitted).num_days();
                if waiting > thresholds.review_stall_days {
                    flag(
                        HealthStatus::NeedsAttention,
                        format!("Content awaiting review for {waiting} days"),
                    );
                }
            }
        }
        _ => {}
    }

    if let (Some(raw), Some(score)) = (raw_communication, communication_score) {
        if raw < f64::from(thresholds.communication_floor) {
            flag(
                HealthStatus::NeedsAttention,
                format!("Slow communication (score {score})"),
            );
        }
    }

    if reasons.is_empty() {
        reasons.push("Partnership is on track".to_string());
    }

    PartnershipHealth {
        partnership_id: partnership.id,
        status,
        metrics: PartnershipHealthMetrics {
            days_active,
            deliverable_progress,
            overdue_deliverables: overdue,
            on_time_delivery,
            communication_score,
            avg_response_minutes,
        },
        reasons,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn progress_percent(partnership: &Partnership) -> u8 {
    let (done, total) = partnership
        .deliverables
        .iter()
        .fold((0u64, 0u64), |(done, total), d| {
            (
                done + u64::from(d.completed.min(d.quantity)),
                total + u64::from(d.quantity),
            )
        });
    if total == 0 {
        return 0;
    }
    (done as f64 * 100.0 / total as f64).round() as u8
}

fn average(samples: &[f64]) -> Option<f64> {
    let valid: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|m| m.is_finite() && *m >= 0.0)
        .collect();
    if valid.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let avg = valid.iter().sum::<f64>() / valid.len() as f64;
    Some(avg)
}

/// Two points lost per hour of average response time, clamped to 0..=100.
fn raw_communication_score(avg_minutes: f64) -> f64 {
    (100.0 - (avg_minutes / 60.0) * 2.0).clamp(0.0, 100.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_score(raw: f64) -> u8 {
    raw.round() as u8
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use collab_core::{Deliverable, DeliverableType, NewPartnership};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap()
    }

    fn partnership(status: PartnershipStatus, age_days: i64) -> Partnership {
        let mut p = Partnership::from_new(
            NewPartnership {
                match_id: None,
                brand_id: Uuid::new_v4(),
                creator_id: Uuid::new_v4(),
                agreed_rate: None,
                deliverables: vec![],
            },
            now() - Duration::days(age_days),
        );
        p.status = status;
        p
    }

    #[test]
    fn overdue_deliverable_is_at_risk() {
        let mut p = partnership(PartnershipStatus::Active, 10);
        let mut reel = Deliverable::new(DeliverableType::Reel, 4);
        reel.completed = 1;
        reel.due_date = Some(now().date_naive() - Duration::days(3));
        p.deliverables = vec![reel];

        let health = evaluate_health(&p, &[], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::AtRisk);
        assert!(health
            .reasons
            .contains(&"1 overdue deliverable(s)".to_string()));
        assert_eq!(health.metrics.deliverable_progress, 25);
        assert_eq!(health.metrics.on_time_delivery, Some(false));
        assert_eq!(health.metrics.days_active, 10);
    }

    #[test]
    fn fresh_partnership_is_healthy_with_affirmative_reason() {
        let p = partnership(PartnershipStatus::Negotiating, 2);
        let health = evaluate_health(&p, &[], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.reasons.len(), 1);
        assert_eq!(health.metrics.deliverable_progress, 0);
        assert!(health.metrics.on_time_delivery.is_none());
        assert!(health.metrics.communication_score.is_none());
    }

    #[test]
    fn long_negotiation_needs_attention() {
        let p = partnership(PartnershipStatus::Negotiating, 8);
        let health = evaluate_health(&p, &[], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::NeedsAttention);

        let p = partnership(PartnershipStatus::Negotiating, 7);
        let health = evaluate_health(&p, &[], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::Healthy);
    }

    #[test]
    fn stalled_execution_is_at_risk() {
        let mut p = partnership(PartnershipStatus::Active, 31);
        let mut post = Deliverable::new(DeliverableType::Post, 4);
        post.completed = 1;
        p.deliverables = vec![post];
        let health = evaluate_health(&p, &[], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::AtRisk);

        p.deliverables[0].completed = 2;
        let health = evaluate_health(&p, &[], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::Healthy);
    }

    #[test]
    fn unreviewed_content_needs_attention() {
        let mut p = partnership(PartnershipStatus::ContentPending, 20);
        p.content_submitted_at = Some(now() - Duration::days(6));
        let health = evaluate_health(&p, &[], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::NeedsAttention);

        p.content_submitted_at = Some(now() - Duration::days(5));
        let health = evaluate_health(&p, &[], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::Healthy);
    }

    #[test]
    fn communication_score_from_average_response() {
        let score = |minutes: f64| round_score(raw_communication_score(minutes));
        assert_eq!(score(0.0), 100);
        assert_eq!(score(60.0), 98);
        assert_eq!(score(1_500.0), 50);
        assert_eq!(score(10_000.0), 0);
    }

    #[test]
    fn communication_floor_compares_unrounded_score() {
        let p = partnership(PartnershipStatus::Active, 3);

        let slow = evaluate_health(&p, &[1_510.0], now(), &HealthThresholds::default());
        assert_eq!(slow.metrics.communication_score, Some(50));
        assert_eq!(slow.status, HealthStatus::NeedsAttention);
        assert!(slow
            .reasons
            .contains(&"Slow communication (score 50)".to_string()));

        let at_floor = evaluate_health(&p, &[1_500.0], now(), &HealthThresholds::default());
        assert_eq!(at_floor.metrics.communication_score, Some(50));
        assert_eq!(at_floor.status, HealthStatus::Healthy);
    }

    #[test]
    fn slow_relay_responses_need_attention() {
        let p = partnership(PartnershipStatus::Active, 3);
        let health = evaluate_health(&p, &[1_600.0, 1_700.0], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::NeedsAttention);
        assert_eq!(health.metrics.communication_score, Some(45));
        assert_eq!(health.metrics.avg_response_minutes, Some(1_650.0));
    }

    #[test]
    fn classification_never_downgrades() {
        let mut p = partnership(PartnershipStatus::Negotiating, 9);
        let mut story = Deliverable::new(DeliverableType::Story, 1);
        story.due_date = Some(now().date_naive() - Duration::days(1));
        p.deliverables = vec![story];

        let health = evaluate_health(&p, &[5_000.0], now(), &HealthThresholds::default());
        assert_eq!(health.status, HealthStatus::AtRisk);
        assert_eq!(health.reasons.len(), 3);
    }

    #[test]
    fn severity_order() {
        assert!(HealthStatus::Healthy < HealthStatus::NeedsAttention);
        assert!(HealthStatus::NeedsAttention < HealthStatus::AtRisk);
    }
}
