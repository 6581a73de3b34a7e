pub mod engine;
pub mod types;

pub use engine::{adjusted_rating, complexity_score, final_score, playtime_score};
pub use types::Preferences;
