//! cinefind - terminal movie browser with debounced catalog search.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use url::Url;

use cinefind_api::counter::{CounterClient, LocalSearchCounterApi};
use cinefind_api::tmdb::{LocalTmdbApi, TmdbClient};

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_browser;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run (defaults to `browse`).
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse and search movies interactively (TUI).
    Browse,
    /// Print the popularity-sorted first page of the catalog.
    Popular,
    /// Search the catalog for a query.
    Search(SearchArgs),
    /// Print the top trending search counters.
    Trending(TrendingArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "dune").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Number of counters to fetch. Falls back to config `trending_limit`.
    #[arg(long)]
    limit: Option<u32>,
}

/// Loads the application config for the given directory override.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client() -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Builds a `CounterClient` from config and the `COUNTER_API_KEY`
/// environment variable.
///
/// # Errors
///
/// Returns an error if `counter.endpoint` is not configured,
/// `COUNTER_API_KEY` is not set, or the client fails to build.
#[instrument(skip_all)]
fn build_counter_client(config: &AppConfig) -> Result<CounterClient> {
    let endpoint = config
        .counter
        .endpoint
        .as_deref()
        .context("counter.endpoint is not configured (set it in config.toml)")?;
    let api_key = std::env::var("COUNTER_API_KEY")
        .context("COUNTER_API_KEY environment variable is required")?;

    let base_url = endpoint
        .parse::<Url>()
        .with_context(|| format!("invalid counter.endpoint: {endpoint}"))?;

    CounterClient::builder()
        .base_url(base_url)
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build counter client")
}

/// Prints a movie listing as a table.
fn print_movies(results: &[cinefind_api::tmdb::Movie]) {
    tracing::info!("ID\tTitle\t\t\tRating\tLang\tRelease");
    for movie in results {
        let release = if movie.release_date.is_empty() {
            "-"
        } else {
            movie.release_date.as_str()
        };
        tracing::info!(
            "{}\t{}\t{:.1}\t{}\t{}",
            movie.id,
            movie.title,
            movie.vote_average,
            movie.original_language,
            release,
        );
    }
    tracing::info!("Total: {} movies", results.len());
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_popular() -> Result<()> {
    let client = build_tmdb_client()?;

    let response = client
        .discover_popular()
        .await
        .context("TMDB discover/movie request failed")?;

    tracing::info!("Total results: {}", response.total_results);
    print_movies(&response.results);

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs) -> Result<()> {
    let client = build_tmdb_client()?;

    let response = client
        .search_movies(&args.query)
        .await
        .context("TMDB search/movie request failed")?;

    if response.results.is_empty() {
        tracing::info!("No movies found for {:?}", args.query);
        return Ok(());
    }

    tracing::info!("Total results: {}", response.total_results);
    print_movies(&response.results);

    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the counter client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_trending(args: &TrendingArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_counter_client(&config)?;

    let limit = args.limit.unwrap_or(config.counter.trending_limit);
    let counters = client
        .top_searches(limit)
        .await
        .context("counter top list request failed")?;

    tracing::info!("Rank\tCount\tMovieID\tTerm");
    for (i, counter) in counters.iter().enumerate() {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            i.saturating_add(1),
            counter.count,
            counter.movie_id,
            counter.search_term,
        );
    }
    tracing::info!("Total: {} counters", counters.len());

    Ok(())
}

/// Runs the `browse` subcommand (the TUI).
///
/// # Errors
///
/// Returns an error if client setup or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let tmdb = build_tmdb_client()?;
    let counter = build_counter_client(&config)?;

    run_browser(&config, tmdb, counter)
        .await
        .context("movie browser TUI failed")
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => run_browse(cli.dir.as_ref()).await,
        Commands::Popular => run_popular().await,
        Commands::Search(args) => run_search(&args).await,
        Commands::Trending(args) => run_trending(&args, cli.dir.as_ref()).await,
    }
}
