use chrono::NaiveDate;
use std::sync::Arc;

use crate::core::{GameType, Score};
use crate::error::{Result, ScoreboardError};
use crate::parsers::{ParsedScore, ParserRegistry};
use crate::ranking::{leaderboard_entries, LeaderboardEntry};
use crate::store::{ScoreFilter, ScoreStore, SqliteScoreStore, StoreStats};

/// Main scoreboard orchestrator: parse pastes, store first attempts, rank leaderboards
pub struct ScoreEngine {
    registry: ParserRegistry,
    store: Arc<dyn ScoreStore>,
}

/// Leaderboard request
#[derive(Debug, Clone)]
pub struct LeaderboardQuery {
    pub game_type: GameType,
    pub game_date: Option<NaiveDate>,

    /// Restrict to these users; `None` for the global board
    pub members: Option<Vec<String>>,

    /// Viewer; wins exact ties for display
    pub current_user: Option<String>,
}

impl LeaderboardQuery {
    pub fn global(game_type: GameType) -> Self {
        Self {
            game_type,
            game_date: None,
            members: None,
            current_user: None,
        }
    }

    fn filter(&self) -> ScoreFilter {
        ScoreFilter {
            game_type: self.game_type,
            game_date: self.game_date,
            members: self.members.clone(),
        }
    }
}

impl ScoreEngine {
    /// Create new engine backed by an SQLite store
    pub async fn new(db_path: impl AsRef<str>) -> Result<Self> {
        let store = Arc::new(SqliteScoreStore::new(db_path.as_ref()).await?);
        tracing::info!("Score store opened at {}", db_path.as_ref());
        Ok(Self::with_store(store))
    }

    /// Create engine over any store implementation
    pub fn with_store(store: Arc<dyn ScoreStore>) -> Self {
        Self {
            registry: ParserRegistry::new(),
            store,
        }
    }

    /// Replace the parser registry
    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Recognize pasted text without storing it
    pub fn parse(&self, raw_paste: &str) -> Result<ParsedScore> {
        self.registry
            .try_parse(raw_paste)
            .ok_or(ScoreboardError::UnrecognizedFormat)
    }

    /// Parse and store a user's paste; only the first per game and date is kept
    pub async fn submit(&self, user_id: &str, raw_paste: &str) -> Result<Score> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ScoreboardError::InvalidInput("user id is required".to_string()));
        }

        let parsed = self.parse(raw_paste)?;
        let score = Score::new(user_id, parsed.score_data, raw_paste);

        // Cheap early answer; the store's unique index still decides races
        if self
            .store
            .find(user_id, score.game_type, score.game_date)
            .await?
            .is_some()
        {
            return Err(ScoreboardError::DuplicateSubmission {
                user_id: user_id.to_string(),
                game_type: score.game_type.to_string(),
                game_date: score.score_data.game_date_string(),
            });
        }

        self.store.insert(&score).await?;

        tracing::info!("Stored {}", score.display());

        Ok(score)
    }

    /// Ranked leaderboard for a game
    pub async fn leaderboard(&self, query: &LeaderboardQuery) -> Result<Vec<LeaderboardEntry>> {
        let scores = self.store.list(&query.filter()).await?;

        tracing::debug!(
            "Leaderboard {} ({:?}): {} scores",
            query.game_type,
            query.game_date,
            scores.len()
        );

        Ok(leaderboard_entries(scores, query.current_user.as_deref()))
    }

    /// Get store statistics
    pub async fn stats(&self) -> Result<StoreStats> {
        self.store.stats().await
    }

    /// Clean up old scores
    pub async fn cleanup(&self, max_age_days: i64) -> Result<u64> {
        self.store.cleanup(max_age_days).await
    }
}
