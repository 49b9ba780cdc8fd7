// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use animenotify::application::commands::{
    add_series, list_series, pick_candidate, remove_series, search_series,
};
use animenotify::application::render_candidates;
use animenotify::integrations::*;
use animenotify::repositories::{JsonWatchlistRepository, WatchlistRepository};
use animenotify::services::*;
use animenotify::{AppConfig, AppState, DiscordConfig};

#[derive(Parser)]
#[command(
    name = "animenotify",
    version,
    about = "Posts new episodes of a curated anime watchlist to a Discord channel"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the polling loop
    Run,
    /// Search for a series and start tracking it
    Add {
        /// Title to search for
        query: String,
        /// Pick the Nth search result instead of prompting
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Stop tracking a series
    Remove {
        /// Exact title, case-insensitive
        title: String,
    },
    /// Show tracked series, soonest next episode first
    List,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    // 1. INFRASTRUCTURE
    let http_client = build_http_client(config.http_timeout())?;
    let watchlist_repo: Arc<dyn WatchlistRepository> =
        Arc::new(JsonWatchlistRepository::new(&config.watchlist_path));

    // 2. METADATA
    let mal: Arc<dyn AiringStatusProvider> =
        Arc::new(MalClient::new(http_client.clone(), config.mal_client_id.clone()));
    let jikan = Arc::new(JikanClient::new(http_client.clone()));
    let anilist: Arc<dyn ScheduleProvider> = Arc::new(AniListClient::new(http_client.clone()));
    let resolver = Arc::new(MetadataResolver::new(
        mal,
        jikan.clone(),
        anilist,
        Arc::new(IdTranslationCache::new()),
    ));

    match cli.command {
        Commands::Run => {
            let discord = DiscordConfig::from_env()?;
            let user_agents = UserAgentPool::load(&config.user_agents_file)?;
            let scraper: Arc<dyn PageScraper> = Arc::new(GogoScraper::new(
                http_client.clone(),
                config.listing_url.clone(),
                user_agents,
            ));
            let notifier: Arc<dyn Notifier> = Arc::new(DiscordNotifier::new(
                http_client,
                discord.bot_token,
                discord.channel_id,
                discord.mention,
            ));

            log::info!("Watching {}", config.watchlist_path.display());
            let mut service = ReconciliationService::new(
                watchlist_repo,
                scraper,
                resolver,
                notifier,
                ReconcilerConfig::default(),
            );
            service.run().await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Add { query, pick } => {
            let state = AppState {
                watchlist_repo,
                search: jikan,
                resolver,
            };
            let outcome = match search_series(&state, &query).await {
                Ok(candidates) => {
                    let choice = match pick {
                        Some(choice) => choice,
                        None => prompt_choice(&render_candidates(&candidates))?,
                    };
                    pick_candidate(&candidates, choice)
                        .and_then(|candidate| add_series(&state, candidate))
                }
                Err(message) => Err(message),
            };
            Ok(report(outcome))
        }

        Commands::Remove { title } => {
            let state = AppState {
                watchlist_repo,
                search: jikan,
                resolver,
            };
            Ok(report(remove_series(&state, &title)))
        }

        Commands::List => {
            let state = AppState {
                watchlist_repo,
                search: jikan,
                resolver,
            };
            Ok(report(list_series(&state).await))
        }
    }
}

fn prompt_choice(menu: &str) -> Result<usize> {
    println!("{}", menu);
    print!("> ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading choice")?;
    line.trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", line.trim()))
}

/// Print a command outcome; a failed command exits non-zero.
fn report(outcome: Result<String, String>) -> ExitCode {
    match outcome {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
