use anyhow::Result;
use log::warn;
use scraper::{ElementRef, Html, Selector};

use crate::domain::models::{BggId, GameDetails, PlayerCountVotes};

/// Parse the thing payload: complexity plus the suggested-player-count poll
pub fn parse_game_details(xml: &str, game_id: BggId) -> Result<GameDetails> {
    let document = Html::parse_document(xml);

    Ok(GameDetails {
        complexity: parse_complexity(&document),
        votes: parse_player_count_votes(&document, game_id),
    })
}

/// `averageweight` encodes "not yet weighted" as 0
fn parse_complexity(document: &Html) -> Option<f64> {
    let selector = Selector::parse("averageweight").expect("valid selector");
    let element = document.select(&selector).next()?;
    element
        .value()
        .attr("value")?
        .parse::<f64>()
        .ok()
        .filter(|&w| w > 0.0)
}

fn parse_player_count_votes(document: &Html, game_id: BggId) -> Vec<PlayerCountVotes> {
    let results_selector = Selector::parse(r#"poll[name="suggested_numplayers"] results"#)
        .expect("valid selector");

    let mut votes = Vec::new();
    for results in document.select(&results_selector) {
        match parse_results_row(&results, game_id) {
            Some(row) => votes.push(row),
            None => continue,
        }
    }

    votes
}

fn parse_results_row(results: &ElementRef, game_id: BggId) -> Option<PlayerCountVotes> {
    let raw_count = results.value().attr("numplayers")?;

    // Rows like "4+" carry no usable player count
    let num_players: i32 = match raw_count.parse() {
        Ok(count) => count,
        Err(_) => {
            warn!("Ignoring non-numeric player count row: {}", raw_count);
            return None;
        }
    };

    Some(PlayerCountVotes {
        game_id,
        num_players,
        best_votes: tally(results, "Best"),
        recommended_votes: tally(results, "Recommended"),
        not_recommended_votes: tally(results, "Not Recommended"),
    })
}

fn tally(results: &ElementRef, category: &str) -> i64 {
    let selector = Selector::parse("result").expect("valid selector");
    results
        .select(&selector)
        .find(|r| r.value().attr("value") == Some(category))
        .and_then(|r| r.value().attr("numvotes"))
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
        .max(0)
}
