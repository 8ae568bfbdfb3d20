//! showdeck - browse TMDB TV catalogs from the terminal.

/// Application configuration (TOML).
mod config;
/// Tracing subscriber and runtime log control.
mod logging;
/// Interactive catalog browser.
mod tui;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;

use crate::config::{AppConfig, TmdbConfig, config_path};
use crate::logging::LogControl;
use crate::tui::run_browser;
use showdeck_api::tmdb::{LocalTmdbApi, TmdbClient, TmdbTvDetails, TvShow};
use showdeck_catalog::display::{
    backdrop_url, display_name, find_trailer, format_seasons_episodes, gallery_urls, poster_url,
    related_shows, release_year, top_cast, youtube_url,
};
use showdeck_catalog::url_state::{SEARCH_PATH, parse_href, see_all_href};
use showdeck_catalog::{
    CatalogView, DiscoverQueryCoordinator, DiscoverUrlState, EpisodePicker, GenreFilter,
    LoadOutcome, SearchState, SearchUrlState, TvSearchCoordinator, ViewType,
};
use showdeck_db::{
    TV_SEARCH_HISTORY, clear_search_history, load_search_history, open_db, record_search,
};

const TMDB_TV_URL: &str = "https://www.themoviedb.org/tv/";

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "showdeck", about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print one page of a TV catalog view.
    Discover(DiscoverArgs),
    /// Search TV shows by name.
    Search(SearchArgs),
    /// Manage recent search terms.
    History(HistoryCommand),
    /// Show TV series details.
    Show(ShowArgs),
    /// List the episodes of a season.
    Season(SeasonArgs),
    /// List TV genres usable with `--genres`.
    Genres,
    /// Browse catalogs interactively.
    Browse(BrowseArgs),
    /// Inspect or create the config file.
    Config(ConfigCommand),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Catalog view (e.g. "topRated" or "top-rated"). Default: discover.
    #[arg(long = "type", value_name = "VIEW")]
    view: Option<ViewType>,
    /// Page number. Default: 1.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    page: Option<u32>,
    /// Comma-separated genre IDs (discover view only).
    #[arg(long, value_name = "IDS")]
    genres: Option<GenreFilter>,
    /// Read `page` and `type` from a navigable URL instead.
    #[arg(long, conflicts_with_all = ["view", "page"])]
    url: Option<String>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search text.
    #[arg(long, required = true)]
    query: String,
    /// Page number.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Arguments for the `history` subcommand.
#[derive(clap::Args)]
struct HistoryCommand {
    /// History subcommand to run.
    #[command(subcommand)]
    command: HistorySubcommands,
}

/// Available history subcommands.
#[derive(Subcommand)]
enum HistorySubcommands {
    /// List recent search terms, most recent first.
    List,
    /// Forget all recent search terms.
    Clear,
}

/// Arguments for the `show` subcommand.
#[derive(clap::Args)]
struct ShowArgs {
    /// TMDB series ID.
    #[arg(long, required = true)]
    id: u64,
    /// Also open the series page in a web browser.
    #[arg(long)]
    open: bool,
}

/// Arguments for the `season` subcommand.
#[derive(clap::Args)]
struct SeasonArgs {
    /// TMDB series ID.
    #[arg(long, required = true)]
    id: u64,
    /// Season number.
    #[arg(long, default_value_t = 1)]
    season: u32,
    /// Episode to highlight.
    #[arg(long)]
    episode: Option<u32>,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Initial catalog view.
    #[arg(long = "type", value_name = "VIEW", default_value_t = ViewType::Discover)]
    view: ViewType,
    /// Initial genre filter (comma-separated IDs).
    #[arg(long, value_name = "IDS")]
    genres: Option<GenreFilter>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration.
    Show,
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Loads the config file for `dir`.
fn load_config(dir: Option<&Path>) -> Result<AppConfig> {
    let path = config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&path).context("failed to load config")
}

/// Builds a `TmdbClient` from `TMDB_API_TOKEN` and the `[tmdb]` settings.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<Arc<TmdbClient>> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .min_interval(config.min_interval());
    if let Some(url) = config.base_url.as_deref() {
        builder = builder.base_url(
            url.parse()
                .with_context(|| format!("invalid tmdb.base_url: {url}"))?,
        );
    }
    let client = builder.build().context("failed to build TMDB client")?;
    Ok(Arc::new(client))
}

/// Prints a catalog page as a table.
fn print_shows(view: &CatalogView, page: u32, display_language: &str) {
    if view.is_empty() {
        tracing::info!("No TV shows found.");
        return;
    }
    tracing::info!("ID\tYear\tRating\tName");
    for show in &view.items {
        tracing::info!(
            "{}\t{}\t{:.1}\t{}",
            show.id,
            release_year(show).map_or_else(|| String::from("-"), |y| y.to_string()),
            show.vote_average,
            display_name(show, display_language),
        );
    }
    tracing::info!(
        "Page {}/{} ({} results)",
        page,
        view.page_count(),
        view.total_results
    );
}

fn settled(outcome: LoadOutcome, fallback: impl FnOnce() -> CatalogView) -> CatalogView {
    match outcome {
        LoadOutcome::Ready(view) => view,
        LoadOutcome::Superseded | LoadOutcome::Failed(_) => fallback(),
    }
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if `--url` cannot be parsed or the TMDB client fails to build.
/// Upstream failures print an empty result instead.
#[instrument(skip_all)]
async fn run_discover(args: &DiscoverArgs, config: &AppConfig) -> Result<()> {
    let url_state = match &args.url {
        Some(href) => DiscoverUrlState::from_href(href)?,
        None => DiscoverUrlState {
            page: args.page.unwrap_or(1),
            view: args.view.unwrap_or_default(),
        },
    };
    let genres = args.genres.clone().unwrap_or_default();
    if !genres.is_empty() && !url_state.view.accepts_genres() {
        tracing::warn!(view = %url_state.view, "--genres only applies to the discover view");
    }

    let client = build_tmdb_client(&config.tmdb)?;
    let coordinator =
        DiscoverQueryCoordinator::with_state(client, url_state.into_state(genres))
            .language(config.tmdb.language.as_str());
    let view = settled(coordinator.refresh().await, || coordinator.current_view());

    let state = coordinator.state();
    tracing::info!(
        "{} ({})",
        state.view().label(),
        DiscoverUrlState::from_state(&state).to_href()
    );
    print_shows(&view, state.page(), config.tmdb.display_language());
    Ok(())
}

/// Runs the `search` subcommand and records the term in the search history.
///
/// # Errors
///
/// Returns an error if the query is blank, the TMDB client fails to build,
/// or the history cannot be written.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig, dir: Option<&Path>) -> Result<()> {
    let mut state = SearchState::new(&args.query);
    state.set_page(args.page);
    if !state.is_enabled() {
        bail!("search query must not be blank");
    }

    let client = build_tmdb_client(&config.tmdb)?;
    let search = TvSearchCoordinator::with_state(client, state)
        .language(config.tmdb.language.as_str());
    let view = settled(search.refresh().await, || search.current_view());

    let state = search.state();
    let conn = open_db(dir).context("failed to open database")?;
    record_search(
        &conn,
        TV_SEARCH_HISTORY,
        state.query(),
        config.search.history_limit,
    )
    .context("failed to record search history")?;

    let href = SearchUrlState::from_state(&state).apply(&parse_href(SEARCH_PATH)?);
    tracing::info!(
        "Search \"{}\" ({}?{})",
        state.query(),
        href.path(),
        href.query().unwrap_or_default()
    );
    print_shows(&view, state.page(), config.tmdb.display_language());
    Ok(())
}

/// Runs the `history list` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
#[instrument(skip_all)]
fn run_history_list(dir: Option<&Path>) -> Result<()> {
    let conn = open_db(dir).context("failed to open database")?;
    let terms = load_search_history(&conn, TV_SEARCH_HISTORY)?;
    if terms.is_empty() {
        tracing::info!("No search history.");
        return Ok(());
    }
    for (i, term) in terms.iter().enumerate() {
        tracing::info!("{:>2}  {}", i.saturating_add(1), term);
    }
    Ok(())
}

/// Runs the `history clear` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be written.
#[instrument(skip_all)]
fn run_history_clear(dir: Option<&Path>) -> Result<()> {
    let conn = open_db(dir).context("failed to open database")?;
    if clear_search_history(&conn, TV_SEARCH_HISTORY)? {
        tracing::info!("Cleared search history.");
    } else {
        tracing::info!("Search history is already empty.");
    }
    Ok(())
}

/// Runs the `show` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_show(args: &ShowArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(&config.tmdb)?;
    let details = client
        .tv_details(args.id, &config.tmdb.language)
        .await
        .context("TMDB tv details request failed")?;

    tracing::info!("ID: {}", details.id);
    tracing::info!(
        "Name: {}",
        display_name(&details, config.tmdb.display_language())
    );
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("Tagline: {tagline}");
    }
    tracing::info!(
        "First Air Date: {}",
        details.first_air_date.as_deref().unwrap_or("-")
    );
    tracing::info!("Status: {}", details.status.as_deref().unwrap_or("-"));
    tracing::info!(
        "Length: {}",
        format_seasons_episodes(details.number_of_seasons, details.number_of_episodes)
    );
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres: {}", genres.join(", "));
    tracing::info!("Rating: {:.1}", details.vote_average);
    tracing::info!("Poster: {}", poster_url(&details, false));
    tracing::info!("Backdrop: {}", backdrop_url(&details, true));
    tracing::info!("---");
    for season in &details.seasons {
        tracing::info!(
            "  Season {}: {} episodes (air_date: {})",
            season.season_number,
            season.episode_count,
            season.air_date.as_deref().unwrap_or("-"),
        );
    }
    if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
        tracing::info!("---");
        tracing::info!("{overview}");
    }
    print_detail_sections(&details, config.tmdb.display_language());

    if args.open {
        let url = format!("{TMDB_TV_URL}{}", details.id);
        open::that(&url).with_context(|| format!("failed to open {url}"))?;
    }
    Ok(())
}

/// Prints cast, trailer, gallery and related listings of a detail page.
fn print_detail_sections(details: &TmdbTvDetails, display_language: &str) {
    let cast = top_cast(details);
    if !cast.is_empty() {
        tracing::info!("--- Cast");
        for member in cast {
            if member.character.is_empty() {
                tracing::info!("  {}", member.name);
            } else {
                tracing::info!("  {} as {}", member.name, member.character);
            }
        }
    }

    tracing::info!("--- Trailer");
    match find_trailer(&details.videos.results) {
        Some(video) => tracing::info!("  {}: {}", video.name, youtube_url(video)),
        None => tracing::info!("  -"),
    }

    let gallery = gallery_urls(details);
    if !gallery.is_empty() {
        tracing::info!("--- Gallery");
        for url in &gallery {
            tracing::info!("  {url}");
        }
    }

    print_related(
        "Recommendations",
        related_shows(details.recommendations.as_ref()),
        display_language,
    );
    print_related(
        "Similar",
        related_shows(details.similar.as_ref()),
        display_language,
    );
}

fn print_related(title: &str, shows: &[TvShow], display_language: &str) {
    if shows.is_empty() {
        return;
    }
    tracing::info!("--- {title}");
    for show in shows {
        tracing::info!(
            "  {}\t{}\t{}",
            show.id,
            release_year(show).map_or_else(|| String::from("-"), |y| y.to_string()),
            display_name(show, display_language)
        );
    }
}

/// Runs the `season` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build. A failed season load
/// prints an empty episode list.
#[instrument(skip_all)]
async fn run_season(args: &SeasonArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(&config.tmdb)?;
    let mut picker = EpisodePicker::new(client, args.id).language(config.tmdb.language.as_str());
    picker.select_season(args.season).await;
    if let Some(episode) = args.episode {
        picker.select_episode(episode);
    }

    let (season, current) = picker.selection();
    tracing::info!("Series {} / Season {}", picker.series_id(), season);
    if picker.episodes().is_empty() {
        tracing::info!("No episodes found.");
        return Ok(());
    }
    for ep in picker.episodes() {
        let marker = if ep.episode_number == current { '>' } else { ' ' };
        tracing::info!(
            "{marker} E{:02}: {} (air_date: {}, runtime: {}min)",
            ep.episode_number,
            ep.name,
            ep.air_date.as_deref().unwrap_or("-"),
            ep.runtime
                .map_or_else(|| String::from("-"), |r| r.to_string()),
        );
    }
    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_genres(config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(&config.tmdb)?;
    let list = client
        .tv_genres(&config.tmdb.language)
        .await
        .context("TMDB genre list request failed")?;

    tracing::info!("ID\tName");
    for genre in &list.genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build, log output cannot be
/// muted or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &AppConfig, log: &LogControl) -> Result<()> {
    let client = build_tmdb_client(&config.tmdb)?;

    let genres = match client.tv_genres(&config.tmdb.language).await {
        Ok(list) => list.genres,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "failed to load genres, filter pane disabled");
            Vec::new()
        }
    };

    let state = DiscoverUrlState {
        page: 1,
        view: args.view,
    }
    .into_state(args.genres.clone().unwrap_or_default());
    let coordinator = DiscoverQueryCoordinator::with_state(client, state)
        .language(config.tmdb.language.as_str());

    // Log lines would land on the alternate screen
    let mute = log.mute()?;
    let result = run_browser(&coordinator, genres, config.tmdb.display_language()).await;
    drop(mute);
    result.context("catalog browser failed")?;

    let last = coordinator.state();
    tracing::info!(
        "Last view: {}",
        DiscoverUrlState::from_state(&last).to_href()
    );
    tracing::info!("See all: {}", see_all_href(last.view()));
    Ok(())
}

/// Runs the `config` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
#[instrument(skip_all)]
fn run_config(cmd: &ConfigSubcommands, dir: Option<&Path>) -> Result<()> {
    let path = config_path(dir).context("failed to resolve config path")?;
    match cmd {
        ConfigSubcommands::Show => {
            let config = AppConfig::load(&path).context("failed to load config")?;
            tracing::info!("# {}", path.display());
            for line in config.to_toml()?.lines() {
                tracing::info!("{line}");
            }
        }
        ConfigSubcommands::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            AppConfig::default()
                .save(&path)
                .context("failed to save config")?;
            tracing::info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let log = logging::init();

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match cli.command {
        Commands::Discover(args) => run_discover(&args, &load_config(dir)?).await,
        Commands::Search(args) => run_search(&args, &load_config(dir)?, dir).await,
        Commands::History(history) => match history.command {
            HistorySubcommands::List => run_history_list(dir),
            HistorySubcommands::Clear => run_history_clear(dir),
        },
        Commands::Show(args) => run_show(&args, &load_config(dir)?).await,
        Commands::Season(args) => run_season(&args, &load_config(dir)?).await,
        Commands::Genres => run_genres(&load_config(dir)?).await,
        Commands::Browse(args) => run_browse(&args, &load_config(dir)?, &log).await,
        Commands::Config(cmd) => run_config(&cmd.command, dir),
        Commands::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "showdeck", &mut io::stdout());
            Ok(())
        }
    }
}
