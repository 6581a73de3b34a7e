use crate::domain::models::{Game, PlayerCountVotes};

use super::types::Preferences;

const RATING_MIDPOINT: f64 = 5.0;
const BEST_WEIGHT: f64 = 1.1;
const RECOMMENDED_WEIGHT: f64 = 0.9;
const NOT_RECOMMENDED_WEIGHT: f64 = 0.5;
const MIN_DAMPING_FACTOR: f64 = 0.1;

/// Rating re-weighted by player-count vote sentiment
///
/// The deviation from the rating midpoint is scaled by a convex blend of
/// how the community votes the requested player count, amplifying ratings
/// where the count is "best" and damping where it is "not recommended".
/// Every missing input falls back to the unmodified base rating.
pub fn adjusted_rating(
    game: &Game,
    votes: &[PlayerCountVotes],
    desired_player_count: Option<i32>,
) -> f64 {
    let Some(rating) = game.rating else {
        return 0.0;
    };

    // Single valid player count, nothing to adjust for
    if game.min_players == game.max_players {
        return rating;
    }

    let Some(count) = desired_player_count else {
        return rating;
    };

    let Some(row) = find_vote_row(votes, count) else {
        return rating;
    };

    let total = row.total();
    if total <= 0 {
        return rating;
    }

    let blend = vote_blend(row, total as f64);
    RATING_MIDPOINT + (rating - RATING_MIDPOINT) * blend
}

fn find_vote_row(votes: &[PlayerCountVotes], count: i32) -> Option<&PlayerCountVotes> {
    votes.iter().find(|row| row.num_players == count)
}

fn vote_blend(row: &PlayerCountVotes, total: f64) -> f64 {
    let p_best = row.best_votes as f64 / total;
    let p_recommended = row.recommended_votes as f64 / total;
    let p_not_recommended = row.not_recommended_votes as f64 / total;

    p_best * BEST_WEIGHT
        + p_recommended * RECOMMENDED_WEIGHT
        + p_not_recommended * NOT_RECOMMENDED_WEIGHT
}

/// Linear falloff around the desired complexity: 1 on target, 0 at the
/// deviation bound, negative past it. Missing inputs are neutral.
pub fn complexity_score(game: &Game, target: Option<f64>, max_deviation: Option<f64>) -> f64 {
    linear_falloff(game.complexity, target, max_deviation)
}

/// Same falloff shape applied to the nominal playtime
pub fn playtime_score(game: &Game, target: Option<f64>, max_deviation: Option<f64>) -> f64 {
    linear_falloff(game.playtime.map(|p| p as f64), target, max_deviation)
}

fn linear_falloff(actual: Option<f64>, target: Option<f64>, max_deviation: Option<f64>) -> f64 {
    let (Some(actual), Some(target), Some(deviation)) = (actual, target, max_deviation) else {
        return 1.0;
    };

    if deviation <= 0.0 {
        return 1.0;
    }

    1.0 - (target - actual).abs() / deviation
}

/// Single ranking score for a (game, preferences) pair
///
/// The adjusted rating is the dominant term; complexity and playtime act
/// as multiplicative damping, clamped so one mismatched axis can never
/// drop the score below a tenth of the adjusted rating. Never fails and
/// never mutates its inputs.
pub fn final_score(game: &Game, preferences: &Preferences, votes: &[PlayerCountVotes]) -> f64 {
    let adjusted = adjusted_rating(game, votes, preferences.player_count);

    let complexity = complexity_score(
        game,
        preferences.target_complexity,
        preferences.max_complexity_deviation,
    )
    .max(0.0);

    let playtime = playtime_score(
        game,
        preferences.target_playtime,
        preferences.max_playtime_deviation,
    )
    .max(0.0);

    let damping = (complexity * playtime).max(MIN_DAMPING_FACTOR);
    adjusted * damping
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn game(min_players: i32, max_players: i32, rating: Option<f64>) -> Game {
        Game {
            bgg_id: 1,
            name: "Test Game".to_string(),
            year_published: Some(2020),
            min_players,
            max_players,
            playtime: Some(60),
            min_playtime: None,
            max_playtime: None,
            complexity: Some(2.5),
            rating,
            bayes_average: None,
            std_deviation: None,
            users_rated: 100,
            thumbnail: None,
            image: None,
        }
    }

    fn vote_row(num_players: i32, best: i64, recommended: i64, not_recommended: i64) -> PlayerCountVotes {
        PlayerCountVotes {
            game_id: 1,
            num_players,
            best_votes: best,
            recommended_votes: recommended,
            not_recommended_votes: not_recommended,
        }
    }

    #[test]
    fn missing_rating_short_circuits_to_zero() {
        let game = game(2, 4, None);
        let votes = [vote_row(3, 10, 5, 1)];
        assert_eq!(adjusted_rating(&game, &votes, Some(3)), 0.0);
    }

    #[test]
    fn fixed_player_count_passes_rating_through() {
        let game = game(4, 4, Some(7.0));
        let votes = [vote_row(4, 100, 0, 0)];
        assert!((adjusted_rating(&game, &votes, Some(4)) - 7.0).abs() < EPS);
    }

    #[test]
    fn no_desired_count_passes_rating_through() {
        let game = game(2, 4, Some(6.5));
        let votes = [vote_row(3, 10, 5, 1)];
        assert!((adjusted_rating(&game, &votes, None) - 6.5).abs() < EPS);
    }

    #[test]
    fn missing_vote_row_passes_rating_through() {
        let game = game(2, 4, Some(6.5));
        let votes = [vote_row(2, 3, 4, 5), vote_row(3, 1, 2, 3), vote_row(4, 0, 1, 9)];
        assert!((adjusted_rating(&game, &votes, Some(6)) - 6.5).abs() < EPS);
    }

    #[test]
    fn all_zero_row_carries_no_signal() {
        let game = game(2, 4, Some(8.1));
        let votes = [vote_row(3, 0, 0, 0)];
        assert!((adjusted_rating(&game, &votes, Some(3)) - 8.1).abs() < EPS);
    }

    #[test]
    fn mostly_best_votes_amplify_the_rating() {
        let game = game(2, 5, Some(8.0));
        let votes = [vote_row(4, 9, 1, 0)];
        // 5 + 3 * (0.9 * 1.1 + 0.1 * 0.9) = 8.24
        assert!((adjusted_rating(&game, &votes, Some(4)) - 8.24).abs() < EPS);
    }

    #[test]
    fn adjustment_stays_within_convex_bounds() {
        let game = game(1, 8, Some(8.5));
        let rows = [
            vote_row(2, 50, 0, 0),
            vote_row(3, 0, 50, 0),
            vote_row(4, 0, 0, 50),
            vote_row(5, 17, 29, 4),
        ];
        let r = 8.5;
        let lower = 5.0 + (r - 5.0) * 0.5;
        let upper = 5.0 + (r - 5.0) * 1.1;
        for row in &rows {
            let adjusted = adjusted_rating(&game, &rows, Some(row.num_players));
            assert!(adjusted >= lower - EPS && adjusted <= upper + EPS);
        }
    }

    #[test]
    fn not_recommended_votes_damp_the_rating() {
        let game = game(2, 4, Some(8.0));
        let votes = [vote_row(2, 0, 0, 40)];
        // 5 + 3 * 0.5 = 6.5
        assert!((adjusted_rating(&game, &votes, Some(2)) - 6.5).abs() < EPS);
    }

    #[test]
    fn complexity_on_target_scores_one() {
        let mut g = game(2, 4, Some(7.0));
        g.complexity = Some(3.0);
        assert!((complexity_score(&g, Some(3.0), Some(2.0)) - 1.0).abs() < EPS);
    }

    #[test]
    fn complexity_falloff_is_linear_and_symmetric() {
        let mut g = game(2, 4, Some(7.0));
        g.complexity = Some(4.0);
        assert!((complexity_score(&g, Some(3.0), Some(2.0)) - 0.5).abs() < EPS);

        g.complexity = Some(2.0);
        assert!((complexity_score(&g, Some(3.0), Some(2.0)) - 0.5).abs() < EPS);

        g.complexity = Some(5.0);
        assert!(complexity_score(&g, Some(3.0), Some(2.0)).abs() < EPS);
    }

    #[test]
    fn missing_complexity_inputs_are_neutral() {
        let mut g = game(2, 4, Some(7.0));
        assert!((complexity_score(&g, None, Some(2.0)) - 1.0).abs() < EPS);
        assert!((complexity_score(&g, Some(3.0), None) - 1.0).abs() < EPS);
        g.complexity = None;
        assert!((complexity_score(&g, Some(3.0), Some(2.0)) - 1.0).abs() < EPS);
    }

    #[test]
    fn playtime_falloff_matches_complexity_shape() {
        let mut g = game(2, 4, Some(7.0));
        g.playtime = Some(90);
        assert!((playtime_score(&g, Some(60.0), Some(60.0)) - 0.5).abs() < EPS);
        g.playtime = None;
        assert!((playtime_score(&g, Some(60.0), Some(60.0)) - 1.0).abs() < EPS);
    }

    #[test]
    fn empty_preferences_reduce_to_adjusted_rating() {
        let game = game(2, 4, Some(7.3));
        let votes = [vote_row(3, 12, 4, 2)];
        let score = final_score(&game, &Preferences::default(), &votes);
        assert!((score - 7.3).abs() < EPS);
    }

    #[test]
    fn damping_factor_never_drops_below_floor() {
        let mut g = game(2, 4, Some(8.0));
        g.complexity = Some(5.0);
        g.playtime = Some(300);
        let prefs = Preferences {
            player_count: None,
            target_complexity: Some(1.0),
            max_complexity_deviation: Some(0.5),
            target_playtime: Some(30.0),
            max_playtime_deviation: Some(10.0),
        };
        // Both axes clamp to zero; the floor keeps a tenth of the rating.
        let score = final_score(&g, &prefs, &[]);
        assert!((score - 0.8).abs() < EPS);
    }

    #[test]
    fn single_mismatched_axis_damps_without_zeroing() {
        let mut g = game(2, 4, Some(8.0));
        g.complexity = Some(3.0);
        g.playtime = Some(45);
        let prefs = Preferences {
            player_count: None,
            target_complexity: Some(3.0),
            max_complexity_deviation: Some(1.0),
            target_playtime: Some(90.0),
            max_playtime_deviation: Some(60.0),
        };
        // Complexity neutral, playtime 1 - 45/60 = 0.25
        let score = final_score(&g, &prefs, &[]);
        assert!((score - 8.0 * 0.25).abs() < EPS);
    }

    #[test]
    fn zero_deviation_is_treated_as_unset() {
        let mut g = game(2, 4, Some(7.0));
        g.complexity = Some(2.0);
        assert!((complexity_score(&g, Some(3.0), Some(0.0)) - 1.0).abs() < EPS);
    }
}
