use serde::{Deserialize, Serialize};

/// Stable BoardGameGeek identifier
pub type BggId = i64;

/// One board game in the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub bgg_id: BggId,
    pub name: String,
    pub year_published: Option<i32>,
    pub min_players: i32,
    pub max_players: i32,
    pub playtime: Option<i64>,
    pub min_playtime: Option<i64>,
    pub max_playtime: Option<i64>,
    pub complexity: Option<f64>,
    pub rating: Option<f64>,
    pub bayes_average: Option<f64>,
    pub std_deviation: Option<f64>,
    pub users_rated: i64,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
}

/// Community votes for one (game, player count) combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCountVotes {
    pub game_id: BggId,
    pub num_players: i32,
    pub best_votes: i64,
    pub recommended_votes: i64,
    pub not_recommended_votes: i64,
}

impl PlayerCountVotes {
    pub fn total(&self) -> i64 {
        self.best_votes + self.recommended_votes + self.not_recommended_votes
    }
}

/// Per-game detail payload from the thing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetails {
    pub complexity: Option<f64>,
    pub votes: Vec<PlayerCountVotes>,
}
