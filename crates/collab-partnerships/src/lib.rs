//! Partnership lifecycle and health.
//!
//! [`lifecycle`] holds the pure state-machine rules, [`service`] applies them
//! against a [`collab_core::PartnershipStore`] with optimistic concurrency,
//! and [`health`] classifies a partnership from its timing and relay data.

pub mod error;
pub mod health;
pub mod lifecycle;
pub mod service;

pub use error::PartnershipError;
pub use health::{evaluate_health, HealthStatus, PartnershipHealth, PartnershipHealthMetrics};
pub use lifecycle::SlotEffect;
pub use service::{
    approve_content, complete_partnership, create_partnership, get_partnership,
    get_partnership_health, list_partnerships, mark_deliverable_complete, mark_payment_sent, rate,
    submit_content, transition_status, update_deliverables, update_notes,
};
