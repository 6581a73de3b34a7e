use std::collections::HashMap;

use super::models::{BggId, Game};

/// Collection of games indexed by BGG ID
///
/// The collection endpoint can return duplicate entries for a title owned
/// in multiple versions; indexing by ID deduplicates them.
pub struct GameCollection {
    games: HashMap<BggId, Game>,
}

impl GameCollection {
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    pub fn add(&mut self, game: Game) {
        self.games.insert(game.bgg_id, game);
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, id: BggId) -> Option<&Game> {
        self.games.get(&id)
    }

    pub fn into_vec(self) -> Vec<Game> {
        let mut games: Vec<Game> = self.games.into_values().collect();
        games.sort_by(|a, b| a.name.cmp(&b.name));
        games
    }
}

impl Default for GameCollection {
    fn default() -> Self {
        Self::new()
    }
}
