use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use crate::domain::models::{BggId, Game};

const GAME_COLUMNS: &str = "bgg_id, name, year_published, min_players, max_players, playtime, min_playtime, max_playtime, complexity, rating, bayes_average, std_deviation, users_rated, thumbnail, image";

/// Insert a game, or refresh its attributes on re-ingest
pub fn upsert_game(conn: &mut DbConn, game: &Game) -> Result<()> {
    let sql = "INSERT INTO games (bgg_id, name, year_published, min_players, max_players, playtime, min_playtime, max_playtime, complexity, rating, bayes_average, std_deviation, users_rated, thumbnail, image, fetched_at) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16) \
               ON CONFLICT(bgg_id) DO UPDATE SET \
               name = excluded.name, year_published = excluded.year_published, \
               min_players = excluded.min_players, max_players = excluded.max_players, \
               playtime = excluded.playtime, min_playtime = excluded.min_playtime, \
               max_playtime = excluded.max_playtime, complexity = excluded.complexity, \
               rating = excluded.rating, bayes_average = excluded.bayes_average, \
               std_deviation = excluded.std_deviation, users_rated = excluded.users_rated, \
               thumbnail = excluded.thumbnail, image = excluded.image, \
               fetched_at = excluded.fetched_at";

    conn.execute(
        sql,
        params![
            game.bgg_id,
            game.name,
            game.year_published,
            game.min_players,
            game.max_players,
            game.playtime,
            game.min_playtime,
            game.max_playtime,
            game.complexity,
            game.rating,
            game.bayes_average,
            game.std_deviation,
            game.users_rated,
            game.thumbnail,
            game.image,
            Utc::now().to_rfc3339(),
        ],
    )
    .with_context(|| format!("Failed to upsert game {}", game.bgg_id))?;

    Ok(())
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Game>> {
    let sql = format!("SELECT {} FROM games ORDER BY name", GAME_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_game_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn get_by_bgg_id(conn: &mut DbConn, bgg_id: BggId) -> Result<Option<Game>> {
    let sql = format!("SELECT {} FROM games WHERE bgg_id = ?1", GAME_COLUMNS);

    conn.query_row(&sql, params![bgg_id], parse_game_row)
        .optional()
        .with_context(|| format!("Failed to look up game {}", bgg_id))
}

pub fn count(conn: &mut DbConn) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
        .context("Failed to count games")
}

fn parse_game_row(row: &rusqlite::Row) -> rusqlite::Result<Game> {
    Ok(Game {
        bgg_id: row.get(0)?,
        name: row.get(1)?,
        year_published: row.get(2)?,
        min_players: row.get(3)?,
        max_players: row.get(4)?,
        playtime: row.get(5)?,
        min_playtime: row.get(6)?,
        max_playtime: row.get(7)?,
        complexity: row.get(8)?,
        rating: row.get(9)?,
        bayes_average: row.get(10)?,
        std_deviation: row.get(11)?,
        users_rated: row.get(12)?,
        thumbnail: row.get(13)?,
        image: row.get(14)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::create_memory_pool;
    use crate::database::setup;

    fn sample_game(bgg_id: BggId, name: &str) -> Game {
        Game {
            bgg_id,
            name: name.to_string(),
            year_published: Some(2019),
            min_players: 1,
            max_players: 5,
            playtime: Some(70),
            min_playtime: Some(40),
            max_playtime: Some(70),
            complexity: Some(2.45),
            rating: Some(8.1),
            bayes_average: Some(7.9),
            std_deviation: Some(1.3),
            users_rated: 55000,
            thumbnail: Some("https://example.com/t.jpg".to_string()),
            image: None,
        }
    }

    #[test]
    fn upsert_then_list_round_trips() {
        let pool = create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        setup::initialize(&mut conn).unwrap();

        upsert_game(&mut conn, &sample_game(266192, "Wingspan")).unwrap();
        let games = list_all(&mut conn).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Wingspan");
        assert_eq!(games[0].complexity, Some(2.45));
        assert_eq!(games[0].image, None);
    }

    #[test]
    fn upsert_refreshes_existing_row() {
        let pool = create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        setup::initialize(&mut conn).unwrap();

        upsert_game(&mut conn, &sample_game(1, "Old Name")).unwrap();
        let mut updated = sample_game(1, "New Name");
        updated.rating = Some(6.6);
        upsert_game(&mut conn, &updated).unwrap();

        assert_eq!(count(&mut conn).unwrap(), 1);
        let game = get_by_bgg_id(&mut conn, 1).unwrap().unwrap();
        assert_eq!(game.name, "New Name");
        assert_eq!(game.rating, Some(6.6));
    }

    #[test]
    fn unknown_id_is_none() {
        let pool = create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        setup::initialize(&mut conn).unwrap();
        assert!(get_by_bgg_id(&mut conn, 404).unwrap().is_none());
    }
}
