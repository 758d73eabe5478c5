use regex::Regex;
use std::sync::LazyLock;

use crate::core::{GamePayload, GameType, ScoreData, WordleScore};
use crate::parsers::epoch::{parse_grouped_number, PuzzleEpoch, WORDLE_EPOCH};
use crate::parsers::ScoreParser;

// "Wordle 1,661 4/6" with an optional hard-mode star
static WORDLE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)wordle\s+([0-9][0-9,]*)\s+([0-9]+)/([0-9]+)(\*)?").expect("valid wordle regex")
});

/// Parser for the Wordle share text
#[derive(Debug, Clone)]
pub struct WordleParser {
    epoch: PuzzleEpoch,
}

impl WordleParser {
    pub fn new() -> Self {
        Self::with_epoch(WORDLE_EPOCH)
    }

    pub fn with_epoch(epoch: PuzzleEpoch) -> Self {
        Self { epoch }
    }
}

impl Default for WordleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreParser for WordleParser {
    fn try_parse(&self, text: &str) -> Option<ScoreData> {
        let line = text
            .lines()
            .find(|line| line.to_lowercase().contains("wordle"))?
            .trim();

        let caps = WORDLE_LINE_RE.captures(line)?;
        let game_number = parse_grouped_number(&caps[1])?;
        let guesses: u32 = caps[2].parse().ok()?;
        let max_guesses: u32 = caps[3].parse().ok()?;

        if guesses < 1 || guesses > max_guesses {
            tracing::debug!("Wordle guesses out of range: {}/{}", guesses, max_guesses);
            return None;
        }

        let game_date = self.epoch.date_for(game_number)?;

        Some(ScoreData::new(
            game_date,
            GamePayload::Wordle(WordleScore {
                game_number,
                guesses,
                max_guesses,
                hard_mode: caps.get(4).is_some(),
            }),
        ))
    }

    fn game_type(&self) -> GameType {
        GameType::Wordle
    }
}
