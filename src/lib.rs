pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod scoring;

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use log::{info, warn};

use api::BggClient;
use cache::DetailsCache;
use cli::{Cli, Command, ThemeAction};
use config::Settings;
use database::{DbConn, DbPool};
use domain::{GameCollection, GameDetails, IngestProgress, PlayerCountVotes};
use ranking::ScoredGame;
use scoring::Preferences;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

/// Pull the owned collection plus per-game details and persist everything
pub async fn handle_ingest(username: Option<String>, refresh: bool) -> Result<()> {
    let settings = Settings::from_env();
    let username = username.unwrap_or_else(|| settings.username.clone());

    let pool = open_database(&settings)?;
    let mut conn = get_conn(&pool)?;
    database::setup::initialize(&mut conn)?;

    let client = BggClient::new()?;
    let cache = DetailsCache::new(&settings.cache_dir)?;

    let mut collection = GameCollection::new();
    for game in client.fetch_collection(&username).await? {
        collection.add(game);
    }

    if collection.is_empty() {
        warn!("Nothing to ingest for {}", username);
        return Ok(());
    }

    info!("Ingesting {} games", collection.len());
    let games = collection.into_vec();
    let mut progress = IngestProgress::new(games.len());

    for mut game in games {
        let details = load_details(&client, &cache, game.bgg_id, refresh, &mut progress).await?;

        // The thing endpoint carries the authoritative complexity
        if details.complexity.is_some() {
            game.complexity = details.complexity;
        }

        database::games::upsert_game(&mut conn, &game)?;
        database::votes::replace_for_game(&mut conn, game.bgg_id, &details.votes)?;
    }

    info!(
        "Ingest complete: {} games in {}",
        database::games::count(&mut conn)?,
        settings.database_path.display()
    );
    Ok(())
}

async fn load_details(
    client: &BggClient,
    cache: &DetailsCache,
    game_id: domain::BggId,
    refresh: bool,
    progress: &mut IngestProgress,
) -> Result<GameDetails> {
    if !refresh {
        if let Some(details) = cache.get(game_id)? {
            progress.mark_cached();
            return Ok(details);
        }
    }

    let details = client.fetch_game_details(game_id).await?;
    cache.store(game_id, &details)?;
    progress.mark_fetched();
    Ok(details)
}

/// Score the stored collection against the preferences and print the ranking
pub fn handle_rank(
    players: Option<i32>,
    complexity: Option<f64>,
    complexity_tolerance: Option<f64>,
    playtime: Option<f64>,
    playtime_tolerance: Option<f64>,
    limit: usize,
) -> Result<()> {
    let preferences = build_preferences(
        players,
        complexity,
        complexity_tolerance,
        playtime,
        playtime_tolerance,
    )?;

    if preferences.is_unset() {
        info!("No preferences set, ranking by community rating alone");
    }

    let settings = Settings::from_env();
    let pool = open_database(&settings)?;
    let mut conn = get_conn(&pool)?;
    database::setup::initialize(&mut conn)?;

    let games = database::games::list_all(&mut conn)?;
    if games.is_empty() {
        warn!("The collection is empty, run `shelf-ranker ingest` first");
        return Ok(());
    }

    let votes = database::votes::list_all(&mut conn)?;
    let ranked = ranking::rank_games(games, &votes, &preferences);

    if ranked.is_empty() {
        println!("No games support the requested player count.");
        return Ok(());
    }

    print_ranked_table(&ranked, &votes, limit);
    Ok(())
}

fn build_preferences(
    players: Option<i32>,
    complexity: Option<f64>,
    complexity_tolerance: Option<f64>,
    playtime: Option<f64>,
    playtime_tolerance: Option<f64>,
) -> Result<Preferences> {
    ensure_positive("complexity-tolerance", complexity_tolerance)?;
    ensure_positive("playtime-tolerance", playtime_tolerance)?;

    Ok(Preferences {
        player_count: players,
        target_complexity: complexity,
        max_complexity_deviation: complexity_tolerance,
        target_playtime: playtime,
        max_playtime_deviation: playtime_tolerance,
    })
}

fn ensure_positive(flag: &str, value: Option<f64>) -> Result<()> {
    if let Some(v) = value {
        if v <= 0.0 {
            anyhow::bail!("--{} must be positive", flag);
        }
    }
    Ok(())
}

fn print_ranked_table(ranked: &[ScoredGame], votes: &[PlayerCountVotes], limit: usize) {
    let header = format!(
        "{:>4}  {:<36} {:>7} {:>7} {:>11} {:>9}  {}",
        "#", "Name", "Score", "Rating", "Complexity", "Playtime", "Best at"
    );
    println!("{}", header.bold());

    for (idx, scored) in ranked.iter().take(limit).enumerate() {
        let game = &scored.game;
        let game_votes: Vec<PlayerCountVotes> = votes
            .iter()
            .filter(|v| v.game_id == game.bgg_id)
            .cloned()
            .collect();

        println!(
            "{:>4}  {:<36} {} {:>7} {:>11} {:>9}  {}",
            idx + 1,
            truncate(&game.name, 36),
            format!("{:>7.2}", scored.score).green().bold(),
            format_f64(game.rating),
            format_f64(game.complexity),
            format_i64(game.playtime),
            format_best_counts(&game_votes).dimmed()
        );
    }
}

fn truncate(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let mut truncated: String = name.chars().take(max_chars - 1).collect();
        truncated.push('…');
        truncated
    }
}

fn format_f64(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn format_i64(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn format_best_counts(votes: &[PlayerCountVotes]) -> String {
    let counts = ranking::best_player_counts(votes);
    if counts.is_empty() {
        "-".to_string()
    } else {
        counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Theme tag management
pub fn handle_themes(action: ThemeAction) -> Result<()> {
    let settings = Settings::from_env();
    let pool = open_database(&settings)?;
    let mut conn = get_conn(&pool)?;
    database::setup::initialize(&mut conn)?;

    match action {
        ThemeAction::List { bgg_id } => {
            let game = require_game(&mut conn, bgg_id)?;
            let themes = database::themes::list_for_game(&mut conn, bgg_id)?;
            if themes.is_empty() {
                println!("{} has no themes yet", game.name);
            } else {
                println!("{}: {}", game.name.bold(), themes.join(", "));
            }
        }
        ThemeAction::Add { bgg_id, theme } => {
            let game = require_game(&mut conn, bgg_id)?;
            let stored = database::themes::add_theme(&mut conn, bgg_id, &theme)?;
            println!("{} \"{}\" to {}", "Added".green(), stored, game.name);
        }
        ThemeAction::Remove { bgg_id, theme } => {
            let game = require_game(&mut conn, bgg_id)?;
            if database::themes::remove_theme(&mut conn, bgg_id, &theme)? {
                println!("{} \"{}\" from {}", "Removed".green(), theme, game.name);
            } else {
                println!("{} has no theme \"{}\"", game.name, theme);
            }
        }
        ThemeAction::All => {
            for theme in database::themes::list_all_distinct(&mut conn)? {
                println!("{}", theme);
            }
        }
    }

    Ok(())
}

fn require_game(conn: &mut DbConn, bgg_id: domain::BggId) -> Result<domain::Game> {
    database::games::get_by_bgg_id(conn, bgg_id)?
        .with_context(|| format!("No game with BGG ID {} in the collection", bgg_id))
}

/// Drop and recreate the schema
pub fn handle_reset() -> Result<()> {
    let settings = Settings::from_env();
    let pool = open_database(&settings)?;
    let mut conn = get_conn(&pool)?;
    database::setup::reset(&mut conn)?;
    println!("Database reset: {}", settings.database_path.display());
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn open_database(settings: &Settings) -> Result<DbPool> {
    database::create_pool(&settings.database_path)
}

fn get_conn(pool: &DbPool) -> Result<DbConn> {
    pool.get().context("Failed to get database connection")
}
