use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::Score;

/// Anything that can sit on a leaderboard
pub trait Rankable {
    fn game_date(&self) -> NaiveDate;

    /// Sorted ascending
    fn sort_score(&self) -> i64;

    fn user_id(&self) -> &str;
}

impl Rankable for Score {
    fn game_date(&self) -> NaiveDate {
        self.game_date
    }

    fn sort_score(&self) -> i64 {
        self.score_data.sort_score
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Leaderboard order: newest date first, then `sort_score` ascending.
///
/// When `current_user` is given and date and score tie exactly, that user's
/// record comes first. This is display emphasis only; do not pass a user when
/// the order decides placement.
pub fn compare_scores<T: Rankable + ?Sized>(a: &T, b: &T, current_user: Option<&str>) -> Ordering {
    b.game_date()
        .cmp(&a.game_date())
        .then_with(|| a.sort_score().cmp(&b.sort_score()))
        .then_with(|| match current_user {
            Some(me) => (b.user_id() == me).cmp(&(a.user_id() == me)),
            None => Ordering::Equal,
        })
}

/// Sort in leaderboard order. Stable: full ties keep their input order.
pub fn rank_scores<T: Rankable>(scores: &mut [T], current_user: Option<&str>) {
    scores.sort_by(|a, b| compare_scores(a, b, current_user));
}

/// One row of a rendered leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based display position
    pub position: usize,
    pub is_current_user: bool,
    pub score: Score,
}

/// Rank scores and number them for display
pub fn leaderboard_entries(mut scores: Vec<Score>, current_user: Option<&str>) -> Vec<LeaderboardEntry> {
    rank_scores(&mut scores, current_user);

    scores
        .into_iter()
        .enumerate()
        .map(|(index, score)| LeaderboardEntry {
            position: index + 1,
            is_current_user: current_user.is_some_and(|me| score.user_id == me),
            score,
        })
        .collect()
}
