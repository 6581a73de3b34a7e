use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(
    name = "shelf-ranker",
    version,
    about = "Browse and rank a BoardGameGeek collection"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the owned collection and per-game details into the local database
    Ingest {
        /// BGG username (falls back to BGG_USERNAME)
        #[arg(long)]
        username: Option<String>,

        /// Refetch game details even when cached
        #[arg(long)]
        refresh: bool,
    },

    /// Score the collection against preferences and print the ranking
    Rank {
        /// Desired player count
        #[arg(long)]
        players: Option<i32>,

        /// Target complexity (1.0 - 5.0)
        #[arg(long, requires = "complexity_tolerance")]
        complexity: Option<f64>,

        /// Acceptable complexity deviation
        #[arg(long, requires = "complexity")]
        complexity_tolerance: Option<f64>,

        /// Target playtime in minutes
        #[arg(long, requires = "playtime_tolerance")]
        playtime: Option<f64>,

        /// Acceptable playtime deviation in minutes
        #[arg(long, requires = "playtime")]
        playtime_tolerance: Option<f64>,

        /// Number of games to print
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },

    /// Manage freeform theme tags
    Themes {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Drop and recreate the database schema
    Reset,

    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// List themes attached to a game
    List { bgg_id: i64 },

    /// Attach a theme to a game
    Add { bgg_id: i64, theme: String },

    /// Detach a theme from a game
    Remove { bgg_id: i64, theme: String },

    /// List every distinct theme in the collection
    All,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn tolerance_requires_its_target() {
        let result = Cli::try_parse_from(["shelf-ranker", "rank", "--complexity-tolerance", "1.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn target_requires_its_tolerance() {
        let result = Cli::try_parse_from(["shelf-ranker", "rank", "--playtime", "60"]);
        assert!(result.is_err());
    }
}
