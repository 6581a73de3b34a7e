mod collection;
mod thing;

pub use collection::parse_collection;
pub use thing::parse_game_details;
