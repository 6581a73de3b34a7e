use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::models::{BggId, Game, PlayerCountVotes};
use crate::scoring::{final_score, Preferences};

/// A game paired with its ranking score
#[derive(Debug, Clone)]
pub struct ScoredGame {
    pub game: Game,
    pub score: f64,
}

/// Score and sort a collection against the current preferences
///
/// Games whose player range excludes the desired count are filtered out
/// entirely rather than scored down. Output is descending by score with
/// name as the tie breaker, so re-renders are deterministic.
pub fn rank_games(
    games: Vec<Game>,
    votes: &[PlayerCountVotes],
    preferences: &Preferences,
) -> Vec<ScoredGame> {
    let votes_by_game = group_votes(votes);

    let mut scored: Vec<ScoredGame> = games
        .into_iter()
        .filter(|game| supports_player_count(game, preferences.player_count))
        .map(|game| score_game(game, &votes_by_game, preferences))
        .collect();

    scored.sort_by(compare_scored);
    scored
}

fn group_votes(votes: &[PlayerCountVotes]) -> HashMap<BggId, Vec<PlayerCountVotes>> {
    let mut grouped: HashMap<BggId, Vec<PlayerCountVotes>> = HashMap::new();
    for row in votes {
        grouped.entry(row.game_id).or_default().push(row.clone());
    }
    grouped
}

fn supports_player_count(game: &Game, desired: Option<i32>) -> bool {
    match desired {
        Some(count) => game.min_players <= count && count <= game.max_players,
        None => true,
    }
}

fn score_game(
    game: Game,
    votes_by_game: &HashMap<BggId, Vec<PlayerCountVotes>>,
    preferences: &Preferences,
) -> ScoredGame {
    let empty = Vec::new();
    let votes = votes_by_game.get(&game.bgg_id).unwrap_or(&empty);
    let score = final_score(&game, preferences, votes);
    ScoredGame { game, score }
}

fn compare_scored(a: &ScoredGame, b: &ScoredGame) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.game.name.cmp(&b.game.name))
}

/// Player counts whose vote plurality is "best"
pub fn best_player_counts(votes: &[PlayerCountVotes]) -> Vec<i32> {
    let mut counts: Vec<i32> = votes
        .iter()
        .filter(|row| row.total() > 0)
        .filter(|row| {
            row.best_votes >= row.recommended_votes
                && row.best_votes >= row.not_recommended_votes
        })
        .map(|row| row.num_players)
        .collect();

    counts.sort_unstable();
    counts
}
