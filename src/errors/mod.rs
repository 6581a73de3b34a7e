/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Add context to cache errors
pub fn cache_context(operation: &str, game_id: i64) -> String {
    format!("Failed to {} cached details for game {}", operation, game_id)
}
