use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::models::{BggId, PlayerCountVotes};

/// Replace the full vote set for a game
///
/// Ingestion never updates vote rows in place; the old set is dropped and
/// the fresh one inserted.
pub fn replace_for_game(
    conn: &mut DbConn,
    game_id: BggId,
    votes: &[PlayerCountVotes],
) -> Result<()> {
    let tx = conn
        .transaction()
        .context("Failed to start vote replacement transaction")?;

    tx.execute("DELETE FROM player_votes WHERE game_id = ?1", params![game_id])
        .with_context(|| format!("Failed to clear votes for game {}", game_id))?;

    for row in votes {
        tx.execute(
            "INSERT INTO player_votes (game_id, num_players, best_votes, recommended_votes, not_recommended_votes) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                game_id,
                row.num_players,
                row.best_votes,
                row.recommended_votes,
                row.not_recommended_votes
            ],
        )
        .with_context(|| format!("Failed to insert votes for game {}", game_id))?;
    }

    tx.commit().context("Failed to commit vote replacement")
}

pub fn list_by_game(conn: &mut DbConn, game_id: BggId) -> Result<Vec<PlayerCountVotes>> {
    let sql = "SELECT game_id, num_players, best_votes, recommended_votes, not_recommended_votes FROM player_votes WHERE game_id = ?1 ORDER BY num_players";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![game_id], parse_vote_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<PlayerCountVotes>> {
    let sql = "SELECT game_id, num_players, best_votes, recommended_votes, not_recommended_votes FROM player_votes ORDER BY game_id, num_players";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_vote_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_vote_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerCountVotes> {
    Ok(PlayerCountVotes {
        game_id: row.get(0)?,
        num_players: row.get(1)?,
        best_votes: row.get(2)?,
        recommended_votes: row.get(3)?,
        not_recommended_votes: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::create_memory_pool;
    use crate::database::{games, setup};
    use crate::domain::models::Game;

    fn seed_game(conn: &mut DbConn, bgg_id: BggId) {
        let game = Game {
            bgg_id,
            name: format!("Game {}", bgg_id),
            year_published: None,
            min_players: 2,
            max_players: 5,
            playtime: None,
            min_playtime: None,
            max_playtime: None,
            complexity: None,
            rating: Some(7.0),
            bayes_average: None,
            std_deviation: None,
            users_rated: 0,
            thumbnail: None,
            image: None,
        };
        games::upsert_game(conn, &game).unwrap();
    }

    fn vote_row(game_id: BggId, num_players: i32, best: i64) -> PlayerCountVotes {
        PlayerCountVotes {
            game_id,
            num_players,
            best_votes: best,
            recommended_votes: 1,
            not_recommended_votes: 0,
        }
    }

    #[test]
    fn replace_swaps_the_full_set() {
        let pool = create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        setup::initialize(&mut conn).unwrap();
        seed_game(&mut conn, 10);

        replace_for_game(&mut conn, 10, &[vote_row(10, 2, 5), vote_row(10, 3, 9)]).unwrap();
        replace_for_game(&mut conn, 10, &[vote_row(10, 4, 2)]).unwrap();

        let votes = list_by_game(&mut conn, 10).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].num_players, 4);
        assert_eq!(votes[0].best_votes, 2);
    }

    #[test]
    fn list_all_spans_games() {
        let pool = create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        setup::initialize(&mut conn).unwrap();
        seed_game(&mut conn, 1);
        seed_game(&mut conn, 2);

        replace_for_game(&mut conn, 1, &[vote_row(1, 2, 3)]).unwrap();
        replace_for_game(&mut conn, 2, &[vote_row(2, 3, 4), vote_row(2, 4, 5)]).unwrap();

        let all = list_all(&mut conn).unwrap();
        assert_eq!(all.len(), 3);
    }
}
