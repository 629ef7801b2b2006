//! Command-line driver for the movie finder core.
//!
//! A thin shell over the controllers: every subcommand builds the
//! [`AppContext`] from configuration, drives one controller on the main task
//! and prints what it observed.
//!
//! # Usage
//!
//! ```text
//! movie-finder search "batman" --pages 3
//! movie-finder details 603
//! movie-finder favorites add 603
//! movie-finder favorites list
//! ```
//!
//! The API key comes from `catalog.api_key` in the `--config` file or from
//! `TMDB_API_KEY`.

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use movie_finder::observability::init_tracing;
use movie_finder::{initialize, AppContext, Config, Movie, ViewEvent};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::mpsc::{self, UnboundedReceiver};

#[derive(Parser)]
#[command(name = "movie-finder")]
#[command(about = "Search a movie catalog and keep a list of favorites", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the catalog by title
    Search {
        query: String,

        /// Number of result pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show the full record of one movie
    Details { id: i64 },
    /// Manage the favorites list
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites in the order they were added
    List,
    /// Fetch a movie by id and add it to favorites
    Add { id: i64 },
    /// Remove a movie from favorites
    Remove { id: i64 },
    /// Remove every favorite
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> movie_finder::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_env_overrides();

    if cli.verbose {
        config.log_to_stderr = true;
        config.trace_level = Some("debug".to_string());
    }
    Ok(config)
}

async fn run(command: Command, config: &Config) -> movie_finder::Result<()> {
    let ctx = initialize(config)?;

    match command {
        Command::Search { query, pages } => search(&ctx, &query, pages).await,
        Command::Details { id } => {
            let movie = details(&ctx, id).await?;
            print_movie(&movie, ctx.favorites().is_favorite(&movie));
            Ok(())
        }
        Command::Favorites { action } => favorites(&ctx, action).await,
    }
}

async fn search(ctx: &AppContext, query: &str, pages: u32) -> movie_finder::Result<()> {
    let (tx, mut events) = mpsc::unbounded_channel();
    let mut search = ctx.search_controller(tx);

    search.search(query);
    search.process_next().await;
    for _ in 1..pages {
        if !search.load_more().is_issued() {
            break;
        }
        search.process_next().await;
    }
    report_errors(&mut events)?;

    for movie in search.results() {
        let star = if search.is_favorite(movie) { "*" } else { " " };
        println!(
            "{star} {:>8}  {}  ({})  {:.1}",
            movie.id,
            movie.title,
            movie.formatted_release_date(),
            movie.vote_average
        );
    }
    if search.has_more_pages() {
        println!("... more results available (page {})", search.current_page());
    }
    Ok(())
}

async fn details(ctx: &AppContext, id: i64) -> movie_finder::Result<Movie> {
    let (tx, mut events) = mpsc::unbounded_channel();
    let mut detail = ctx.detail_controller(placeholder(id), tx);

    detail.load_details();
    detail.process_next().await;
    report_errors(&mut events)?;

    if let Some(record) = detail.detail() {
        println!("Runtime: {}", record.formatted_runtime());
        println!("Genres:  {}", record.genre_names());
    }
    Ok(detail.current_movie())
}

async fn favorites(ctx: &AppContext, action: FavoritesAction) -> movie_finder::Result<()> {
    let (tx, _events) = mpsc::unbounded_channel();
    let mut list = ctx.favorites_controller(tx);

    match action {
        FavoritesAction::List => {
            list.load();
            if list.last_load_corrupted() {
                eprintln!("warning: favorites file is unreadable, showing none");
            }
            if list.is_empty() {
                println!("No favorites yet.");
            }
            for movie in list.favorites() {
                println!("{:>8}  {}", movie.id, movie.title);
            }
        }
        FavoritesAction::Add { id } => {
            let movie = details(ctx, id).await?;
            ctx.favorites().add(&movie)?;
            println!("Added {}", movie.title);
        }
        FavoritesAction::Remove { id } => {
            list.remove(&placeholder(id))?;
            println!("{} favorites left", list.count());
        }
        FavoritesAction::Clear => {
            list.clear_all()?;
            println!("Favorites cleared");
        }
    }
    Ok(())
}

fn report_errors(events: &mut UnboundedReceiver<ViewEvent>) -> movie_finder::Result<()> {
    while let Ok(event) = events.try_recv() {
        if let ViewEvent::Error(e) = event {
            return Err(e.into());
        }
    }
    Ok(())
}

fn print_movie(movie: &Movie, is_favorite: bool) {
    println!("{} ({})", movie.title, movie.original_title);
    println!("Released: {}", movie.formatted_release_date());
    println!("Rating:   {:.1} ({} votes)", movie.vote_average, movie.vote_count);
    println!("Budget:   {}", movie.formatted_budget());
    println!("Revenue:  {}", movie.formatted_revenue());
    println!("Favorite: {}", if is_favorite { "yes" } else { "no" });
    if !movie.overview.is_empty() {
        println!("\n{}", movie.overview);
    }
}

/// Identity-only movie, for calls that only need the id.
fn placeholder(id: i64) -> Movie {
    Movie {
        id,
        title: String::new(),
        original_title: String::new(),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        release_date: String::new(),
        vote_average: 0.0,
        vote_count: 0,
        budget: None,
        revenue: None,
    }
}
