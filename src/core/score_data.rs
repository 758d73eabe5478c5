use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScoreboardError;

/// Games the parsers know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Wordle,
    Connections,
    DigitParty,
}

impl GameType {
    pub const ALL: [GameType; 3] = [GameType::Wordle, GameType::Connections, GameType::DigitParty];

    /// Stable tag used in storage and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Wordle => "wordle",
            GameType::Connections => "connections",
            GameType::DigitParty => "digitparty",
        }
    }

    /// Whether a lower raw value (guesses, mistakes) is the better result
    pub fn lower_is_better(&self) -> bool {
        !matches!(self, GameType::DigitParty)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ScoreboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wordle" => Ok(GameType::Wordle),
            "connections" => Ok(GameType::Connections),
            "digitparty" | "digit-party" | "digit party" => Ok(GameType::DigitParty),
            other => Err(ScoreboardError::UnknownGame(other.to_string())),
        }
    }
}

/// How the Connections mistake count was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MistakeSource {
    /// "N mistakes" text in the paste
    #[default]
    Explicit,
    /// Complete grid: four solved rows, or four wrong rows (game lost)
    Grid,
    /// Grid rows present but the game does not look finished; count is best effort
    PartialGrid,
    /// No grid and no text; reported as zero mistakes
    NoGrid,
}

impl MistakeSource {
    /// False when the mistake count is a guess
    pub fn is_determinate(&self) -> bool {
        matches!(self, MistakeSource::Explicit | MistakeSource::Grid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordleScore {
    pub game_number: u32,
    pub guesses: u32,
    pub max_guesses: u32,
    #[serde(default)]
    pub hard_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsScore {
    pub puzzle_number: u32,
    pub mistakes: u32,
    #[serde(default)]
    pub mistake_source: MistakeSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitPartyScore {
    pub day: u32,
    pub points: u32,
    pub percentage: u8,
}

/// Game-specific fields, tagged by `gameType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gameType", rename_all = "lowercase")]
pub enum GamePayload {
    Wordle(WordleScore),
    Connections(ConnectionsScore),
    DigitParty(DigitPartyScore),
}

impl GamePayload {
    pub fn game_type(&self) -> GameType {
        match self {
            GamePayload::Wordle(_) => GameType::Wordle,
            GamePayload::Connections(_) => GameType::Connections,
            GamePayload::DigitParty(_) => GameType::DigitParty,
        }
    }

    /// Human-readable rendering of the result
    pub fn display_score(&self) -> String {
        match self {
            GamePayload::Wordle(w) => format!("{}/{}", w.guesses, w.max_guesses),
            GamePayload::Connections(c) => match c.mistakes {
                0 => "Perfect!".to_string(),
                1 => "1 mistake".to_string(),
                n => format!("{} mistakes", n),
            },
            GamePayload::DigitParty(d) => format!("{} points ({}%)", d.points, d.percentage),
        }
    }

    /// Leaderboard key, sorted ascending: `-guesses`, `-mistakes` or `points`
    pub fn sort_score(&self) -> i64 {
        match self {
            GamePayload::Wordle(w) => -i64::from(w.guesses),
            GamePayload::Connections(c) => -i64::from(c.mistakes),
            GamePayload::DigitParty(d) => i64::from(d.points),
        }
    }
}

/// Normalized result of one successful parse
///
/// `display_score` and `sort_score` are always derived from the payload, so a
/// `ScoreData` built through [`ScoreData::new`] is internally consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreData {
    /// Puzzle date (YYYY-MM-DD), derived from the puzzle number
    pub game_date: NaiveDate,

    /// e.g. "4/6", "Perfect!", "194 points (95%)"
    pub display_score: String,

    /// Signed ordering key; leaderboards sort it ascending
    pub sort_score: i64,

    #[serde(flatten)]
    pub payload: GamePayload,
}

impl ScoreData {
    pub fn new(game_date: NaiveDate, payload: GamePayload) -> Self {
        Self {
            game_date,
            display_score: payload.display_score(),
            sort_score: payload.sort_score(),
            payload,
        }
    }

    pub fn game_type(&self) -> GameType {
        self.payload.game_type()
    }

    /// Date in the fixed-width form used for storage and comparison
    pub fn game_date_string(&self) -> String {
        self.game_date.format("%Y-%m-%d").to_string()
    }

    pub fn as_wordle(&self) -> Option<&WordleScore> {
        match &self.payload {
            GamePayload::Wordle(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_connections(&self) -> Option<&ConnectionsScore> {
        match &self.payload {
            GamePayload::Connections(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_digit_party(&self) -> Option<&DigitPartyScore> {
        match &self.payload {
            GamePayload::DigitParty(d) => Some(d),
            _ => None,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
