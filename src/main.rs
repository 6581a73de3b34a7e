use anyhow::Result;

use shelf_ranker::cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    sensible_env_logger::init!();

    match shelf_ranker::interpret() {
        Command::Ingest { username, refresh } => shelf_ranker::handle_ingest(username, refresh).await,
        Command::Rank {
            players,
            complexity,
            complexity_tolerance,
            playtime,
            playtime_tolerance,
            limit,
        } => shelf_ranker::handle_rank(
            players,
            complexity,
            complexity_tolerance,
            playtime,
            playtime_tolerance,
            limit,
        ),
        Command::Themes { action } => shelf_ranker::handle_themes(action),
        Command::Reset => shelf_ranker::handle_reset(),
        Command::Completions { shell } => shelf_ranker::handle_completions(shell),
    }
}
