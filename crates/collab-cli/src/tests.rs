use collab_core::{DeliverableType, PartnershipStatus};

use super::*;
use crate::partnership::{parse_deliverable, DeliverableAction, RatingSide};

const BRIEF: &str = "6f1c2a9e-3b7d-4e21-9a55-0c8d1e2f3a4b";
const PARTNERSHIP: &str = "2b8e4c61-7d3a-4f90-8e12-5a6b7c8d9e0f";

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["collab-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["collab-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["collab-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn match_run_defaults_leave_overrides_unset() {
    let cli = Cli::try_parse_from(["collab-cli", "match", "run", "--brief", BRIEF]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Match {
            command: MatchCommands::Run {
                min_score: None,
                max_matches: None,
                no_semantic: false,
                ..
            }
        })
    ));
}

#[test]
fn match_run_with_overrides() {
    let cli = Cli::try_parse_from([
        "collab-cli",
        "match",
        "run",
        "--brief",
        BRIEF,
        "--min-score",
        "70",
        "--max-matches",
        "5",
        "--no-semantic",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Match {
            command: MatchCommands::Run {
                min_score: Some(70),
                max_matches: Some(5),
                no_semantic: true,
                ..
            }
        })
    ));
}

#[test]
fn match_run_rejects_min_score_above_100() {
    let result = Cli::try_parse_from([
        "collab-cli",
        "match",
        "run",
        "--brief",
        BRIEF,
        "--min-score",
        "101",
    ]);
    assert!(result.is_err());
}

#[test]
fn match_run_requires_brief() {
    assert!(Cli::try_parse_from(["collab-cli", "match", "run"]).is_err());
}

#[test]
fn match_list_rejects_malformed_brief_id() {
    assert!(Cli::try_parse_from(["collab-cli", "match", "list", "--brief", "nope"]).is_err());
}

#[test]
fn partnership_transition_parses_status() {
    let cli = Cli::try_parse_from([
        "collab-cli",
        "partnership",
        "transition",
        "--id",
        PARTNERSHIP,
        "--to",
        "content_pending",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Partnership {
            command: PartnershipCommands::Transition {
                to: PartnershipStatus::ContentPending,
                ..
            }
        })
    ));
}

#[test]
fn partnership_transition_rejects_unknown_status() {
    let result = Cli::try_parse_from([
        "collab-cli",
        "partnership",
        "transition",
        "--id",
        PARTNERSHIP,
        "--to",
        "archived",
    ]);
    assert!(result.is_err());
}

#[test]
fn partnership_create_collects_repeated_deliverables() {
    let cli = Cli::try_parse_from([
        "collab-cli",
        "partnership",
        "create",
        "--brand",
        BRIEF,
        "--creator",
        PARTNERSHIP,
        "--rate",
        "450.00",
        "--deliverable",
        "reel:2:2026-06-01",
        "--deliverable",
        "story:3",
    ])
    .unwrap();

    let Some(Commands::Partnership {
        command:
            PartnershipCommands::Create {
                match_id,
                rate,
                deliverables,
                ..
            },
    }) = cli.command
    else {
        panic!("expected partnership create");
    };
    assert!(match_id.is_none());
    assert_eq!(rate.map(|r| r.to_string()), Some("450.00".to_string()));
    assert_eq!(deliverables.len(), 2);
    assert_eq!(deliverables[0].kind, DeliverableType::Reel);
    assert_eq!(deliverables[1].quantity, 3);
}

#[test]
fn partnership_rate_takes_side() {
    let cli = Cli::try_parse_from([
        "collab-cli",
        "partnership",
        "rate",
        "--id",
        PARTNERSHIP,
        "--by",
        "creator",
        "--value",
        "4",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Partnership {
            command: PartnershipCommands::Rate {
                by: RatingSide::Creator,
                value: 4,
                ..
            }
        })
    ));
}

#[test]
fn partnership_deliverable_complete_subcommand() {
    let cli = Cli::try_parse_from([
        "collab-cli",
        "partnership",
        "deliverable",
        "--id",
        PARTNERSHIP,
        "complete",
        "--deliverable",
        BRIEF,
        "--completed",
        "2",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Partnership {
            command: PartnershipCommands::Deliverable {
                action: DeliverableAction::Complete { completed: 2, .. },
                ..
            }
        })
    ));
}

#[test]
fn partnership_notes_without_text_clears() {
    let cli =
        Cli::try_parse_from(["collab-cli", "partnership", "notes", "--id", PARTNERSHIP]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Partnership {
            command: PartnershipCommands::Notes { text: None, .. }
        })
    ));
}

#[test]
fn parse_deliverable_accepts_optional_due_date() {
    let d = parse_deliverable("Post:1").unwrap();
    assert_eq!(d.kind, DeliverableType::Post);
    assert_eq!(d.quantity, 1);
    assert_eq!(d.completed, 0);
    assert!(d.due_date.is_none());

    let d = parse_deliverable("ugc:4:2026-07-15").unwrap();
    assert_eq!(d.due_date.map(|d| d.to_string()), Some("2026-07-15".to_string()));
}

#[test]
fn parse_deliverable_rejects_malformed_input() {
    assert!(parse_deliverable("podcast:1").is_err());
    assert!(parse_deliverable("reel").is_err());
    assert!(parse_deliverable("reel:two").is_err());
    assert!(parse_deliverable("reel:1:next-week").is_err());
    assert!(parse_deliverable("reel:1:2026-07-15:extra").is_err());
}
