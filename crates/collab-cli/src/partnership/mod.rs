//! Partnership command handlers for the CLI.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use collab_core::{
    Deliverable, DeliverableType, NewPartnership, Partnership, PartnershipFilter,
    PartnershipStatus, RatingTarget, TuningConfig,
};
use collab_db::PgStore;
use collab_partnerships as partnerships;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Sub-commands available under `partnership`.
#[derive(Debug, Subcommand)]
pub enum PartnershipCommands {
    /// Open a partnership in negotiation and reserve a creator slot
    Create {
        #[arg(long)]
        brand: Uuid,
        #[arg(long)]
        creator: Uuid,
        /// Match the partnership grew out of
        #[arg(long = "match")]
        match_id: Option<Uuid>,
        /// Agreed rate in the brand's currency
        #[arg(long)]
        rate: Option<Decimal>,
        /// Deliverable as `type:quantity[:YYYY-MM-DD]`; repeatable
        #[arg(long = "deliverable", value_parser = parse_deliverable)]
        deliverables: Vec<Deliverable>,
    },
    /// Print one partnership as JSON
    Show {
        #[arg(long)]
        id: Uuid,
    },
    /// List partnerships, newest first
    List {
        #[arg(long)]
        brand: Option<Uuid>,
        #[arg(long)]
        creator: Option<Uuid>,
        #[arg(long)]
        status: Option<PartnershipStatus>,
    },
    /// Move a partnership to another status
    Transition {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        to: PartnershipStatus,
    },
    /// Record that the creator submitted content
    Submit {
        #[arg(long)]
        id: Uuid,
    },
    /// Approve submitted content
    Approve {
        #[arg(long)]
        id: Uuid,
    },
    /// Record that payment was sent
    Pay {
        #[arg(long)]
        id: Uuid,
    },
    /// Complete a partnership under review
    Complete {
        #[arg(long)]
        id: Uuid,
        /// Brand's rating of the creator (1-5)
        #[arg(long)]
        brand_rating: Option<u8>,
        /// Creator's rating of the brand (1-5)
        #[arg(long)]
        creator_rating: Option<u8>,
    },
    /// Record one side's rating
    Rate {
        #[arg(long)]
        id: Uuid,
        /// Side giving the rating
        #[arg(long, value_enum)]
        by: RatingSide,
        #[arg(long)]
        value: u8,
    },
    /// Edit deliverables
    Deliverable {
        #[arg(long)]
        id: Uuid,
        #[command(subcommand)]
        action: DeliverableAction,
    },
    /// Set or clear free-form notes
    Notes {
        #[arg(long)]
        id: Uuid,
        /// New notes; omit to clear
        #[arg(long)]
        text: Option<String>,
    },
    /// Evaluate partnership health
    Health {
        #[arg(long)]
        id: Uuid,
        /// Print the full evaluation as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeliverableAction {
    /// Set the completed count of one deliverable
    Complete {
        #[arg(long)]
        deliverable: Uuid,
        #[arg(long)]
        completed: u32,
    },
    /// Replace the whole deliverable list
    Replace {
        /// Deliverable as `type:quantity[:YYYY-MM-DD]`; repeatable
        #[arg(long = "item", value_parser = parse_deliverable)]
        items: Vec<Deliverable>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RatingSide {
    /// The brand rates the creator
    Brand,
    /// The creator rates the brand
    Creator,
}

impl From<RatingSide> for RatingTarget {
    fn from(side: RatingSide) -> Self {
        match side {
            RatingSide::Brand => RatingTarget::BrandRatesCreator,
            RatingSide::Creator => RatingTarget::CreatorRatesBrand,
        }
    }
}

pub(crate) async fn run(
    store: &PgStore,
    tuning: &TuningConfig,
    command: PartnershipCommands,
) -> anyhow::Result<()> {
    let updated = match command {
        PartnershipCommands::Create {
            brand,
            creator,
            match_id,
            rate,
            deliverables,
        } => {
            partnerships::create_partnership(
                store,
                NewPartnership {
                    match_id,
                    brand_id: brand,
                    creator_id: creator,
                    agreed_rate: rate,
                    deliverables,
                },
            )
            .await?
        }
        PartnershipCommands::Show { id } => {
            let partnership = partnerships::get_partnership(store, id).await?;
            println!("{}", serde_json::to_string_pretty(&partnership)?);
            return Ok(());
        }
        PartnershipCommands::List {
            brand,
            creator,
            status,
        } => {
            let filter = PartnershipFilter {
                brand_id: brand,
                creator_id: creator,
                status,
            };
            let rows = partnerships::list_partnerships(store, &filter).await?;
            print_partnerships(&rows);
            return Ok(());
        }
        PartnershipCommands::Transition { id, to } => {
            partnerships::transition_status(store, id, to).await?
        }
        PartnershipCommands::Submit { id } => partnerships::submit_content(store, id).await?,
        PartnershipCommands::Approve { id } => partnerships::approve_content(store, id).await?,
        PartnershipCommands::Pay { id } => partnerships::mark_payment_sent(store, id).await?,
        PartnershipCommands::Complete {
            id,
            brand_rating,
            creator_rating,
        } => {
            partnerships::complete_partnership(store, id, brand_rating, creator_rating).await?
        }
        PartnershipCommands::Rate { id, by, value } => {
            partnerships::rate(store, id, by.into(), value).await?
        }
        PartnershipCommands::Deliverable { id, action } => match action {
            DeliverableAction::Complete {
                deliverable,
                completed,
            } => {
                partnerships::mark_deliverable_complete(store, id, deliverable, completed).await?
            }
            DeliverableAction::Replace { items } => {
                partnerships::update_deliverables(store, id, items).await?
            }
        },
        PartnershipCommands::Notes { id, text } => {
            partnerships::update_notes(store, id, text.as_deref()).await?
        }
        PartnershipCommands::Health { id, json } => {
            let health = partnerships::get_partnership_health(store, id, &tuning.health).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("{}: {}", health.partnership_id, health.status);
                for reason in &health.reasons {
                    println!("  - {reason}");
                }
            }
            return Ok(());
        }
    };

    print_partnership(&updated);
    Ok(())
}

/// Parse `type:quantity[:YYYY-MM-DD]`, e.g. `reel:2:2026-06-01`.
pub(crate) fn parse_deliverable(raw: &str) -> Result<Deliverable, String> {
    let mut parts = raw.split(':');
    let kind: DeliverableType = parts
        .next()
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|e| format!("{e}"))?;
    let quantity: u32 = parts
        .next()
        .ok_or_else(|| format!("missing quantity in {raw:?}"))?
        .trim()
        .parse()
        .map_err(|e| format!("invalid quantity in {raw:?}: {e}"))?;
    let due_date = parts
        .next()
        .map(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d"))
        .transpose()
        .map_err(|e| format!("invalid due date in {raw:?}: {e}"))?;
    if parts.next().is_some() {
        return Err(format!("too many fields in {raw:?}"));
    }

    let mut deliverable = Deliverable::new(kind, quantity);
    deliverable.due_date = due_date;
    Ok(deliverable)
}

fn print_partnership(p: &Partnership) {
    let (done, total) = p
        .deliverables
        .iter()
        .fold((0u32, 0u32), |(done, total), d| {
            (done.saturating_add(d.completed), total.saturating_add(d.quantity))
        });
    println!("{} {} ({done}/{total} deliverables)", p.id, p.status.as_str());
}

fn print_partnerships(rows: &[Partnership]) {
    if rows.is_empty() {
        println!("no partnerships");
        return;
    }

    println!(
        "{:<38}{:<17}{:<38}CREATED",
        "ID", "STATUS", "CREATOR"
    );
    for p in rows {
        println!(
            "{:<38}{:<17}{:<38}{}",
            p.id.to_string(),
            p.status.as_str(),
            p.creator_id.to_string(),
            p.created_at.format("%Y-%m-%d")
        );
    }
}
