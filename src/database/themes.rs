use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use crate::domain::models::BggId;

/// Attach a theme to a game and return the stored spelling
///
/// Duplicates are rejected case-insensitively per game. When the theme
/// already exists on another game under a different capitalization, that
/// spelling wins so the tag stays consistent across the collection.
pub fn add_theme(conn: &mut DbConn, bgg_id: BggId, theme: &str) -> Result<String> {
    let theme = theme.trim();
    if theme.is_empty() {
        anyhow::bail!("Theme must not be empty");
    }

    if exists_for_game(conn, bgg_id, theme)? {
        anyhow::bail!("Theme \"{}\" already exists for game {}", theme, bgg_id);
    }

    let canonical = canonical_spelling(conn, theme)?.unwrap_or_else(|| theme.to_string());

    conn.execute(
        "INSERT INTO game_themes (bgg_id, theme) VALUES (?1, ?2)",
        params![bgg_id, canonical],
    )
    .with_context(|| format!("Failed to add theme to game {}", bgg_id))?;

    Ok(canonical)
}

pub fn remove_theme(conn: &mut DbConn, bgg_id: BggId, theme: &str) -> Result<bool> {
    let removed = conn
        .execute(
            "DELETE FROM game_themes WHERE bgg_id = ?1 AND LOWER(theme) = LOWER(?2)",
            params![bgg_id, theme.trim()],
        )
        .with_context(|| format!("Failed to remove theme from game {}", bgg_id))?;

    Ok(removed > 0)
}

pub fn list_for_game(conn: &mut DbConn, bgg_id: BggId) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT theme FROM game_themes WHERE bgg_id = ?1 ORDER BY theme")?;
    let rows = stmt
        .query_map(params![bgg_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    Ok(rows)
}

/// All distinct themes across the collection, for autocompletion
pub fn list_all_distinct(conn: &mut DbConn) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT theme FROM game_themes ORDER BY theme")?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    Ok(rows)
}

fn exists_for_game(conn: &mut DbConn, bgg_id: BggId, theme: &str) -> Result<bool> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT theme FROM game_themes WHERE bgg_id = ?1 AND LOWER(theme) = LOWER(?2) LIMIT 1",
            params![bgg_id, theme],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to check for existing theme")?;

    Ok(existing.is_some())
}

fn canonical_spelling(conn: &mut DbConn, theme: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT theme FROM game_themes WHERE LOWER(theme) = LOWER(?1) LIMIT 1",
        params![theme],
        |row| row.get(0),
    )
    .optional()
    .context("Failed to look up canonical theme spelling")
}
