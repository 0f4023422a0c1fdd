mod matching;
mod partnership;

use clap::{Parser, Subcommand};
use collab_core::{AppConfig, TuningConfig};
use tracing_subscriber::EnvFilter;

use crate::matching::MatchCommands;
use crate::partnership::PartnershipCommands;

#[derive(Debug, Parser)]
#[command(name = "collab-cli")]
#[command(about = "Creator/brand collaboration command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Match creators to brand briefs
    Match {
        #[command(subcommand)]
        command: MatchCommands,
    },
    /// Manage brand/creator partnerships
    Partnership {
        #[command(subcommand)]
        command: PartnershipCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("collab-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = collab_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let tuning = load_tuning(&config)?;
    let pool = collab_db::connect_pool_from_config(&config).await?;
    let store = collab_db::PgStore::new(pool);

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                collab_db::ping(store.pool()).await?;
                println!("database reachable");
            }
            DbCommands::Migrate => {
                let applied = collab_db::run_migrations(store.pool()).await?;
                println!("applied {applied} migration(s)");
            }
        },
        Commands::Match { command } => matching::run(&store, &config, &tuning, command).await?,
        Commands::Partnership { command } => partnership::run(&store, &tuning, command).await?,
    }

    Ok(())
}

fn load_tuning(config: &AppConfig) -> anyhow::Result<TuningConfig> {
    match &config.tuning_path {
        Some(path) => {
            let tuning = collab_core::load_tuning(path)?;
            tracing::info!(path = %path.display(), "loaded tuning file");
            Ok(tuning)
        }
        None => Ok(TuningConfig::default()),
    }
}

#[cfg(test)]
mod tests;
