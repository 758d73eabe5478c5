pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::core::{GameType, Score};
use crate::error::Result;

pub use sqlite::SqliteScoreStore;

/// Trait for score persistence
///
/// The store owns the "first attempt only" rule: at most one score per
/// user, game and puzzle date.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Save a new score; `DuplicateSubmission` if the user already has one for that game and date
    async fn insert(&self, score: &Score) -> Result<()>;

    /// Get a user's score for a game and date
    async fn find(&self, user_id: &str, game_type: GameType, game_date: NaiveDate) -> Result<Option<Score>>;

    /// List scores matching a filter, newest date first then `sort_score` ascending
    async fn list(&self, filter: &ScoreFilter) -> Result<Vec<Score>>;

    /// Get store statistics
    async fn stats(&self) -> Result<StoreStats>;

    /// Delete scores submitted more than `max_age_days` ago; `InvalidInput` for a negative or
    /// unrepresentable age
    async fn cleanup(&self, max_age_days: i64) -> Result<u64>;
}

/// Which scores a leaderboard reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreFilter {
    pub game_type: GameType,

    /// Only this puzzle date
    pub game_date: Option<NaiveDate>,

    /// Only these users; `None` is the global board
    pub members: Option<Vec<String>>,
}

impl ScoreFilter {
    /// Every score for a game
    pub fn global(game_type: GameType) -> Self {
        Self {
            game_type,
            game_date: None,
            members: None,
        }
    }

    pub fn on(mut self, game_date: NaiveDate) -> Self {
        self.game_date = Some(game_date);
        self
    }

    pub fn members(mut self, members: Vec<String>) -> Self {
        self.members = Some(members);
        self
    }
}

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_scores: u64,
    pub by_game: BTreeMap<GameType, u64>,
    pub distinct_users: u64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}
