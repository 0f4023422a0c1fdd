//! Matching command handlers for the CLI.

use std::time::Duration;

use clap::Subcommand;
use collab_core::{AppConfig, MatchRecord, MatchingStore, TuningConfig};
use collab_db::PgStore;
use collab_matching::{match_brief_to_creators, MatchOptions, MatchingConfig, TeiClient};
use uuid::Uuid;

/// Sub-commands available under `match`.
#[derive(Debug, Subcommand)]
pub enum MatchCommands {
    /// Score seeking creators against a brief and store the ranked matches
    Run {
        /// Brief to match
        #[arg(long)]
        brief: Uuid,
        /// Drop matches below this hybrid score (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_score: Option<u8>,
        /// Keep at most this many matches
        #[arg(long)]
        max_matches: Option<usize>,
        /// Score with rules only, skipping the embedding service
        #[arg(long)]
        no_semantic: bool,
    },
    /// Show stored matches for a brief, best first
    List {
        /// Brief whose matches to show
        #[arg(long)]
        brief: Uuid,
    },
}

pub(crate) async fn run(
    store: &PgStore,
    config: &AppConfig,
    tuning: &TuningConfig,
    command: MatchCommands,
) -> anyhow::Result<()> {
    match command {
        MatchCommands::Run {
            brief,
            min_score,
            max_matches,
            no_semantic,
        } => {
            let defaults = MatchOptions::from_app_config(config);
            let options = MatchOptions {
                min_score: min_score.unwrap_or(defaults.min_score),
                max_matches: max_matches.unwrap_or(defaults.max_matches),
                use_semantic_matching: !no_semantic,
            };
            run_match(store, config, tuning, brief, options).await
        }
        MatchCommands::List { brief } => {
            let matches = store.list_matches(brief).await?;
            print_matches(&matches);
            Ok(())
        }
    }
}

async fn run_match(
    store: &PgStore,
    config: &AppConfig,
    tuning: &TuningConfig,
    brief_id: Uuid,
    options: MatchOptions,
) -> anyhow::Result<()> {
    let embedder = match config.tei_url.as_deref() {
        Some(url) if options.use_semantic_matching => Some(
            TeiClient::new(url, Duration::from_millis(config.embed_timeout_ms))?
                .with_retries(config.embed_max_retries, config.embed_backoff_base_ms),
        ),
        _ => None,
    };
    if embedder.is_none() && options.use_semantic_matching {
        tracing::info!("COLLAB_TEI_URL not set; new brief embeddings will not be computed");
    }

    let matching_config = MatchingConfig::from_app_config(config, tuning.matching.clone());
    let run = match_brief_to_creators(
        store,
        embedder.as_ref(),
        &matching_config,
        brief_id,
        options,
    )
    .await?;

    println!(
        "brief {brief_id}: {} candidate(s), {} unavailable, {} match(es) stored{}",
        run.candidates,
        run.unavailable,
        run.matches.len(),
        if run.semantic_enabled {
            ""
        } else {
            " (rule-only)"
        }
    );
    print_matches(&run.matches);
    Ok(())
}

fn print_matches(matches: &[MatchRecord]) {
    if matches.is_empty() {
        println!("no matches");
        return;
    }

    println!(
        "{:<8}{:>7}{:>6}{:>6}  {:<7}{:<10}CREATOR",
        "TIER", "HYBRID", "RULE", "SEM", "DREAM", "RESPONSE"
    );
    for m in matches {
        println!(
            "{:<8}{:>7}{:>6}{:>6}  {:<7}{:<10}{}",
            m.tier.as_str(),
            m.result.hybrid_score,
            m.result.rule_score,
            m.result.semantic_score,
            if m.result.is_dream_brand { "yes" } else { "" },
            m.creator_response.as_str(),
            m.result.creator_id
        );
    }
}
