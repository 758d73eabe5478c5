//! # Daily Scoreboard
//!
//! Leaderboards for daily puzzle games, built from the text players paste:
//! - Tolerant share-text parsers (Wordle, Connections, Digit Party)
//! - First-match parser registry
//! - Cross-game leaderboard ordering
//! - SQLite score store with a "first attempt only" rule
//! - Multiple interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use daily_scoreboard::{GameType, LeaderboardQuery, ScoreEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = ScoreEngine::new("scoreboard.db").await?;
//!
//!     let score = engine.submit("google:1234", "Wordle 1,661 4/6").await?;
//!     println!("{} on {}", score.display_score(), score.game_date);
//!
//!     for entry in engine.leaderboard(&LeaderboardQuery::global(GameType::Wordle)).await? {
//!         println!("{}. {} {}", entry.position, entry.score.user_id, entry.score.display_score());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod parsers;
pub mod ranking;
pub mod store;

// Re-export primary types
pub use config::ServerConfig;
pub use crate::core::{GamePayload, GameType, Score, ScoreData};
pub use engine::{LeaderboardQuery, ScoreEngine};
pub use error::{Result, ScoreboardError};
pub use parsers::{try_parse_score, ParsedScore, ParserRegistry, ScoreParser};
pub use ranking::{compare_scores, rank_scores, LeaderboardEntry, Rankable};
pub use store::{ScoreStore, SqliteScoreStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
