use regex::Regex;
use std::sync::LazyLock;

use crate::core::{DigitPartyScore, GamePayload, GameType, ScoreData};
use crate::parsers::epoch::{parse_grouped_number, PuzzleEpoch, DIGIT_PARTY_EPOCH};
use crate::parsers::ScoreParser;

/// Any of these (lowercased) marks the paste as Digit Party
const MARKERS: [&str; 2] = ["digit.party", "digit party"];

// "day 1008: 194 points 95%"
static DIGIT_PARTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)day\s+([0-9][0-9,]*):\s*([0-9]+)\s+points\s+([0-9]+)%")
        .expect("valid digit party regex")
});

/// Parser for the digit.party share text
#[derive(Debug, Clone)]
pub struct DigitPartyParser {
    epoch: PuzzleEpoch,
}

impl DigitPartyParser {
    pub fn new() -> Self {
        Self::with_epoch(DIGIT_PARTY_EPOCH)
    }

    pub fn with_epoch(epoch: PuzzleEpoch) -> Self {
        Self { epoch }
    }
}

impl Default for DigitPartyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreParser for DigitPartyParser {
    fn try_parse(&self, text: &str) -> Option<ScoreData> {
        let lowered = text.to_lowercase();
        if !MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return None;
        }

        let caps = DIGIT_PARTY_RE.captures(text)?;
        let day = parse_grouped_number(&caps[1])?;
        let points: u32 = caps[2].parse().ok()?;
        let percentage: u32 = caps[3].parse().ok()?;

        if percentage > 100 {
            tracing::debug!("Digit Party percentage out of range: {}", percentage);
            return None;
        }

        let game_date = self.epoch.date_for(day)?;

        Some(ScoreData::new(
            game_date,
            GamePayload::DigitParty(DigitPartyScore {
                day,
                points,
                percentage: u8::try_from(percentage).ok()?,
            }),
        ))
    }

    fn game_type(&self) -> GameType {
        GameType::DigitParty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(text: &str) -> Option<ScoreData> {
        DigitPartyParser::new().try_parse(text)
    }

    #[test]
    fn test_canonical_paste() {
        let data = parse("day 1008: 194 points 95%\nhttps://digit.party").unwrap();
        let d = data.as_digit_party().unwrap();

        assert_eq!(data.game_type(), GameType::DigitParty);
        assert_eq!(d.day, 1008);
        assert_eq!(d.points, 194);
        assert_eq!(d.percentage, 95);
        assert_eq!(data.sort_score, 194);
        assert_eq!(data.display_score, "194 points (95%)");
        assert_eq!(data.game_date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn test_grouped_day_and_case() {
        let data = parse("Digit Party\nDay 1,100: 201 Points 100%").unwrap();
        let d = data.as_digit_party().unwrap();
        assert_eq!(d.day, 1100);
        assert_eq!(d.percentage, 100);
    }

    #[test]
    fn test_requires_marker() {
        assert!(parse("day 1008: 194 points 95%").is_none());
    }

    #[test]
    fn test_marker_forms() {
        let score = "day 1008: 194 points 95%";
        for marker in ["https://digit.party", "HTTPS://DIGIT.PARTY/", "digit.party", "Digit Party"] {
            let data = parse(&format!("{}\n{}", score, marker));
            assert_eq!(data.unwrap().as_digit_party().unwrap().day, 1008, "{}", marker);
        }
    }

    #[test]
    fn test_percentage_range() {
        assert!(parse("day 1008: 194 points 101%\ndigit.party").is_none());
        assert!(parse("day 1008: 0 points 0%\ndigit.party").is_some());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse("digit.party\nday 1008 194 points 95%").is_none());
        assert!(parse("digit.party\nday 0: 194 points 95%").is_none());
        assert!(parse("digit.party\nday 1008: 99999999999 points 95%").is_none());
    }
}
