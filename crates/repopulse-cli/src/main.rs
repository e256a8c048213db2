use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use repopulse_core::providers::GitHubHost;
use repopulse_core::{
    Config, PreferenceService, ScoreCalculator, ScoreWeights, SearchEngine, SearchFilter,
};
use repopulse_store::ScoreStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repopulse")]
#[command(version, about = "Repository popularity scoring with per-user weighting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search repositories and score them with the user's weights
    Search {
        /// Earliest creation date of repositories (yyyy-mm-dd)
        #[arg(long, value_parser = parse_date)]
        earliest_created: NaiveDate,
        /// Programming language to filter repositories
        #[arg(long)]
        language: Option<String>,
        /// The user the scores are computed for
        #[arg(long)]
        user_id: i64,
    },
    /// Show the per-factor breakdown of one score
    Breakdown {
        #[arg(long)]
        stars: u32,
        #[arg(long)]
        forks: u32,
        /// Maximum star count used for normalization
        #[arg(long)]
        max_stars: u32,
        /// Maximum fork count used for normalization
        #[arg(long)]
        max_forks: u32,
        /// Date the repository was last updated (yyyy-mm-dd)
        #[arg(long, value_parser = parse_date)]
        updated_at: NaiveDate,
        /// Earliest creation date anchoring the recency window (yyyy-mm-dd)
        #[arg(long, value_parser = parse_date)]
        earliest_created: NaiveDate,
        #[arg(long)]
        user_id: i64,
    },
    /// Manage per-user scoring weights
    #[command(subcommand)]
    Prefs(PrefsCommands),
}

#[derive(clap::Subcommand)]
enum PrefsCommands {
    /// Save a new weight triple for a user
    Set {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        stars_weight: f64,
        #[arg(long)]
        forks_weight: f64,
        #[arg(long)]
        recency_weight: f64,
    },
    /// Show a user's weights (defaults when none are saved)
    Get {
        #[arg(long)]
        user_id: i64,
    },
    /// Overwrite an existing weight triple
    Update {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        stars_weight: f64,
        #[arg(long)]
        forks_weight: f64,
        #[arg(long)]
        recency_weight: f64,
    },
    /// Remove a user's saved weights
    Delete {
        #[arg(long)]
        user_id: i64,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected yyyy-mm-dd): {}", s, e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repopulse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let store = Arc::new(ScoreStore::open(&config.store.resolve_db_path()?)?);
    let prefs = PreferenceService::new(Arc::clone(&store));

    match cli.command {
        Commands::Search {
            earliest_created,
            language,
            user_id,
        } => {
            let host = GitHubHost::with_base_url(config.github.token, config.github.api_url);
            let engine = SearchEngine::new(Box::new(host), store);

            let filter = SearchFilter {
                language,
                created_after: earliest_created,
            };
            tracing::info!("Scoring repositories for user {}", user_id);
            let results = engine.search_scored(&filter, user_id).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Breakdown {
            stars,
            forks,
            max_stars,
            max_forks,
            updated_at,
            earliest_created,
            user_id,
        } => {
            let calculator = ScoreCalculator::new(prefs);
            let breakdown = calculator.breakdown(
                stars,
                forks,
                updated_at,
                max_stars,
                max_forks,
                earliest_created,
                user_id,
            )?;
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }
        Commands::Prefs(command) => run_prefs(command, &prefs)?,
    }

    Ok(())
}

fn run_prefs(command: PrefsCommands, prefs: &PreferenceService) -> anyhow::Result<()> {
    match command {
        PrefsCommands::Set {
            user_id,
            stars_weight,
            forks_weight,
            recency_weight,
        } => {
            let saved = prefs.save(&ScoreWeights {
                user_id,
                stars_weight,
                forks_weight,
                recency_weight,
            })?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        PrefsCommands::Get { user_id } => {
            let weights = prefs.effective(user_id)?;
            println!("{}", serde_json::to_string_pretty(&weights)?);
        }
        PrefsCommands::Update {
            user_id,
            stars_weight,
            forks_weight,
            recency_weight,
        } => {
            let updated = prefs.update(&ScoreWeights {
                user_id,
                stars_weight,
                forks_weight,
                recency_weight,
            })?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        PrefsCommands::Delete { user_id } => {
            prefs.delete(user_id)?;
            println!("Preferences deleted for user {}", user_id);
        }
    }

    Ok(())
}
