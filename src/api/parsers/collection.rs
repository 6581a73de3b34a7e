use anyhow::Result;
use log::warn;
use scraper::{ElementRef, Html, Selector};

use crate::domain::models::Game;

/// Parse the owned-collection payload into game records
///
/// Entries missing an ID or a name, or carrying an inverted player range,
/// are skipped with a warning rather than failing the whole ingest.
pub fn parse_collection(xml: &str) -> Result<Vec<Game>> {
    let document = Html::parse_document(&rename_image_tags(xml));
    let item_selector = Selector::parse("item").expect("valid selector");

    let mut games = Vec::new();
    for item in document.select(&item_selector) {
        if let Some(game) = parse_item(&item) {
            games.push(game);
        }
    }

    Ok(games)
}

/// The HTML tree builder rewrites `<image>` to the void `<img>` element,
/// which loses the URL text. Rename the tag before parsing.
fn rename_image_tags(xml: &str) -> String {
    xml.replace("<image>", "<fullimage>")
        .replace("</image>", "</fullimage>")
}

fn parse_item(item: &ElementRef) -> Option<Game> {
    let bgg_id = match attr_i64(item, "objectid") {
        Some(id) => id,
        None => {
            warn!("Skipping collection entry without an object ID");
            return None;
        }
    };

    let name = match child_text(item, "name") {
        Some(name) if !name.is_empty() => name,
        _ => {
            warn!("Skipping collection entry {} without a name", bgg_id);
            return None;
        }
    };

    let stats = select_first(item, "stats");
    let min_players = stats
        .as_ref()
        .and_then(|s| attr_i64(s, "minplayers"))
        .unwrap_or(1) as i32;
    let max_players = stats
        .as_ref()
        .and_then(|s| attr_i64(s, "maxplayers"))
        .unwrap_or(min_players as i64) as i32;

    if min_players > max_players {
        warn!(
            "Skipping {} ({}): inverted player range {}-{}",
            name, bgg_id, min_players, max_players
        );
        return None;
    }

    Some(Game {
        bgg_id,
        name,
        year_published: child_text(item, "yearpublished")
            .and_then(|y| y.parse::<i32>().ok())
            .filter(|&y| y != 0),
        min_players,
        max_players,
        playtime: stats
            .as_ref()
            .and_then(|s| attr_i64(s, "playingtime"))
            .filter(|&p| p > 0),
        min_playtime: stats
            .as_ref()
            .and_then(|s| attr_i64(s, "minplaytime"))
            .filter(|&p| p > 0),
        max_playtime: stats
            .as_ref()
            .and_then(|s| attr_i64(s, "maxplaytime"))
            .filter(|&p| p > 0),
        complexity: rating_stat_f64(item, "averageweight"),
        rating: rating_stat_f64(item, "average"),
        bayes_average: rating_stat_f64(item, "bayesaverage"),
        std_deviation: rating_stat_f64(item, "stddev"),
        users_rated: rating_stat_i64(item, "usersrated").unwrap_or(0),
        thumbnail: child_text(item, "thumbnail"),
        image: child_text(item, "fullimage"),
    })
}

// --- Element Access Helpers ---

fn select_first<'a>(scope: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).expect("valid selector");
    scope.select(&selector).next()
}

fn child_text(scope: &ElementRef, selector: &str) -> Option<String> {
    let element = select_first(scope, selector)?;
    let text: String = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn attr_i64(element: &ElementRef, name: &str) -> Option<i64> {
    element.value().attr(name)?.parse().ok()
}

fn attr_f64(element: &ElementRef, name: &str) -> Option<f64> {
    element.value().attr(name)?.parse().ok()
}

/// Nested rating statistics carry their value as an attribute; BGG encodes
/// "no data" as 0, which becomes None here.
fn rating_stat_f64(item: &ElementRef, stat: &str) -> Option<f64> {
    let selector = format!("rating {}", stat);
    let element = select_first(item, &selector)?;
    attr_f64(&element, "value").filter(|&v| v > 0.0)
}

fn rating_stat_i64(item: &ElementRef, stat: &str) -> Option<i64> {
    let selector = format!("rating {}", stat);
    let element = select_first(item, &selector)?;
    attr_i64(&element, "value")
}
