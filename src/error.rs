use thiserror::Error;

/// Main error type for the scoreboard
#[derive(Error, Debug)]
pub enum ScoreboardError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No parser recognized the pasted text
    #[error("Score format not recognized")]
    UnrecognizedFormat,

    /// User already submitted a score for this game and date
    #[error("first attempts only! {user_id} already has a {game_type} score for {game_date}")]
    DuplicateSubmission {
        user_id: String,
        game_type: String,
        game_date: String,
    },

    /// Unknown game type tag
    #[error("Unknown game type: {0}")]
    UnknownGame(String),

    /// Caller supplied invalid input (empty user id, bad date, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store errors that are not plain SQLite failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl ScoreboardError {
    /// Whether the caller can fix the request and retry (HTTP 4xx class)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ScoreboardError::UnrecognizedFormat
                | ScoreboardError::DuplicateSubmission { .. }
                | ScoreboardError::UnknownGame(_)
                | ScoreboardError::InvalidInput(_)
        )
    }
}

impl From<String> for ScoreboardError {
    fn from(s: String) -> Self {
        ScoreboardError::Other(s)
    }
}

impl From<&str> for ScoreboardError {
    fn from(s: &str) -> Self {
        ScoreboardError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScoreboardError>;
