pub mod connections;
pub mod digitparty;
pub mod epoch;
pub mod wordle;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use crate::core::{GameType, ScoreData};

pub use connections::ConnectionsParser;
pub use digitparty::DigitPartyParser;
pub use epoch::PuzzleEpoch;
pub use wordle::WordleParser;

/// Pastes larger than this are not share text
pub const MAX_PASTE_BYTES: usize = 16 * 1024;

/// Trait for per-game share-text recognizers
///
/// Implementations are pure: the same text always gives the same answer, and
/// an unrecognized or inconsistent paste gives `None`, never a partial result.
pub trait ScoreParser: Send + Sync {
    /// Parse pasted text, `None` if this game's format is not recognized
    fn try_parse(&self, text: &str) -> Option<ScoreData>;

    /// Game this parser produces
    fn game_type(&self) -> GameType;

    /// Get parser name for logging
    fn name(&self) -> &str {
        self.game_type().as_str()
    }
}

/// Successful dispatch result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScore {
    pub game_type: GameType,
    pub score_data: ScoreData,
}

impl From<ScoreData> for ParsedScore {
    fn from(score_data: ScoreData) -> Self {
        Self {
            game_type: score_data.game_type(),
            score_data,
        }
    }
}

/// Ordered set of parsers; the first one to recognize a paste wins
pub struct ParserRegistry {
    parsers: Vec<Box<dyn ScoreParser>>,
}

impl ParserRegistry {
    /// Wordle, Connections, Digit Party, in that order
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(WordleParser::new()));
        registry.register(Box::new(ConnectionsParser::new()));
        registry.register(Box::new(DigitPartyParser::new()));
        registry
    }

    pub fn empty() -> Self {
        Self { parsers: Vec::new() }
    }

    /// Append a parser; it is tried after every parser already registered
    pub fn register(&mut self, parser: Box<dyn ScoreParser>) {
        self.parsers.push(parser);
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Registered parser names, in try order
    pub fn names(&self) -> Vec<&str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Try each parser in order and return the first match.
    ///
    /// Never panics: a parser that panics is logged and treated as a non-match.
    pub fn try_parse(&self, text: &str) -> Option<ParsedScore> {
        if text.len() > MAX_PASTE_BYTES {
            tracing::debug!("Paste too large to parse: {} bytes", text.len());
            return None;
        }

        for parser in &self.parsers {
            match panic::catch_unwind(AssertUnwindSafe(|| parser.try_parse(text))) {
                Ok(Some(score_data)) => {
                    tracing::debug!(
                        "Parser {} matched: {} on {}",
                        parser.name(),
                        score_data.display_score,
                        score_data.game_date
                    );
                    return Some(ParsedScore::from(score_data));
                }
                Ok(None) => {
                    tracing::trace!("Parser {} did not match", parser.name());
                }
                Err(_) => {
                    tracing::warn!("Parser {} panicked, treating as no match", parser.name());
                }
            }
        }

        None
    }

    /// Parse independent pastes in parallel, keeping input order
    pub fn parse_many<S>(&self, texts: &[S]) -> Vec<Option<ParsedScore>>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|text| self.try_parse(text.as_ref())).collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: LazyLock<ParserRegistry> = LazyLock::new(ParserRegistry::new);

/// Parse with the default registry
pub fn try_parse_score(text: &str) -> Option<ParsedScore> {
    DEFAULT_REGISTRY.try_parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PanickingParser;

    impl ScoreParser for PanickingParser {
        fn try_parse(&self, _text: &str) -> Option<ScoreData> {
            panic!("broken parser");
        }

        fn game_type(&self) -> GameType {
            GameType::Wordle
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_default_order() {
        let registry = ParserRegistry::new();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["wordle", "connections", "digitparty"]);

        let empty = ParserRegistry::empty();
        assert!(empty.is_empty());
        assert!(empty.try_parse("Wordle 1,661 4/6").is_none());
    }

    #[test]
    fn test_dispatch_each_game() {
        let wordle = try_parse_score("Wordle 1,661 4/6\n⬜🟨⬜⬜⬜").unwrap();
        assert_eq!(wordle.game_type, GameType::Wordle);

        let connections =
            try_parse_score("Connections\nPuzzle #100\n🟩🟩🟩🟩\n🟨🟨🟨🟨\n🟦🟦🟦🟦\n🟪🟪🟪🟪").unwrap();
        assert_eq!(connections.game_type, GameType::Connections);

        let digit = try_parse_score("day 1008: 194 points 95%\nhttps://digit.party").unwrap();
        assert_eq!(digit.game_type, GameType::DigitParty);
        assert_eq!(digit.score_data.sort_score, 194);
    }

    #[test]
    fn test_unrecognized() {
        assert!(try_parse_score("Not a valid game paste").is_none());
        assert!(try_parse_score("").is_none());
        assert!(try_parse_score("\u{0}\u{FFFD}🟩🟩🟩🟩 #").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        // Both a Wordle line and a Connections title: Wordle is tried first
        let text = "Wordle 1,661 4/6\nConnections\nPuzzle #942";
        assert_eq!(try_parse_score(text).unwrap().game_type, GameType::Wordle);
    }

    #[test]
    fn test_panicking_parser_is_contained() {
        let mut registry = ParserRegistry::empty();
        registry.register(Box::new(PanickingParser));
        registry.register(Box::new(WordleParser::new()));

        let parsed = registry.try_parse("Wordle 1,661 4/6").unwrap();
        assert_eq!(parsed.game_type, GameType::Wordle);
    }

    #[test]
    fn test_oversized_paste() {
        let text = format!("Wordle 1,661 4/6\n{}", "x".repeat(MAX_PASTE_BYTES));
        assert!(try_parse_score(&text).is_none());
    }

    #[test]
    fn test_parse_many_keeps_order() {
        let texts = vec![
            "day 1008: 194 points 95%\ndigit.party",
            "nothing here",
            "Wordle 1,661 4/6",
        ];
        let results = ParserRegistry::new().parse_many(&texts);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().game_type, GameType::DigitParty);
        assert!(results[1].is_none());
        assert_eq!(results[2].as_ref().unwrap().game_type, GameType::Wordle);
    }

    #[test]
    fn test_sign_convention() {
        let texts = [
            "Wordle 1,661 1/6",
            "Wordle 1,661 6/6",
            "Connections\nPuzzle #942\n🟩🟩🟩🟩",
            "Connections #942\n4 mistakes",
            "day 1008: 0 points 0%\ndigit.party",
        ];
        for text in texts {
            let parsed = try_parse_score(text).unwrap();
            if parsed.game_type.lower_is_better() {
                assert!(parsed.score_data.sort_score <= 0, "{}", text);
            } else {
                assert!(parsed.score_data.sort_score >= 0, "{}", text);
            }
        }
    }
}
