use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{GameType, ScoreData};

/// A stored submission: one user's parsed result plus the text they pasted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// `{user_id}:{game_type}:{game_date}:{created_at_millis}`
    pub id: String,

    /// Composite user id from the auth layer, e.g. `google:1234`
    pub user_id: String,

    pub game_type: GameType,

    pub game_date: NaiveDate,

    pub score_data: ScoreData,

    /// Original paste, kept for audit/debug display
    #[serde(default)]
    pub raw_paste: String,

    pub created_at: DateTime<Utc>,
}

impl Score {
    /// Create a new Score submitted now
    pub fn new(user_id: impl Into<String>, score_data: ScoreData, raw_paste: impl Into<String>) -> Self {
        Self::with_created_at(user_id, score_data, raw_paste, Utc::now())
    }

    pub fn with_created_at(
        user_id: impl Into<String>,
        score_data: ScoreData,
        raw_paste: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let user_id = user_id.into();
        let game_type = score_data.game_type();
        let game_date = score_data.game_date;
        let id = format!(
            "{}:{}:{}:{}",
            user_id,
            game_type,
            score_data.game_date_string(),
            created_at.timestamp_millis()
        );

        Self {
            id,
            user_id,
            game_type,
            game_date,
            score_data,
            raw_paste: raw_paste.into(),
            created_at,
        }
    }

    pub fn display_score(&self) -> &str {
        &self.score_data.display_score
    }

    pub fn sort_score(&self) -> i64 {
        self.score_data.sort_score
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        format!(
            "{} {} {}: {}",
            self.user_id, self.game_type, self.game_date, self.score_data.display_score
        )
    }
}
