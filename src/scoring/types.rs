/// User preferences fed into the scoring engine
///
/// Every field is optional; an unset axis contributes a neutral factor.
/// A deviation only takes effect together with its paired target, and a
/// non-positive deviation is treated as unset.
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    pub player_count: Option<i32>,
    pub target_complexity: Option<f64>,
    pub max_complexity_deviation: Option<f64>,
    pub target_playtime: Option<f64>,
    pub max_playtime_deviation: Option<f64>,
}

impl Preferences {
    pub fn for_player_count(count: i32) -> Self {
        Self {
            player_count: Some(count),
            ..Self::default()
        }
    }

    pub fn is_unset(&self) -> bool {
        self.player_count.is_none()
            && self.target_complexity.is_none()
            && self.target_playtime.is_none()
    }
}
