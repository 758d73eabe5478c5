//! Puzzle numbering helpers shared by the game parsers.
//!
//! Every supported game numbers its daily puzzle from a fixed launch day. The
//! date is computed on the calendar (`NaiveDate`), never through a timestamp,
//! so the result does not depend on the machine's timezone.

use chrono::{Days, NaiveDate};

/// Launch day of a daily game: the date of puzzle number 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleEpoch {
    year: i32,
    month: u32,
    day: u32,
}

/// Wordle #1 (#0 was 2021-06-19)
pub const WORDLE_EPOCH: PuzzleEpoch = PuzzleEpoch::new(2021, 6, 20);

/// Connections #1
pub const CONNECTIONS_EPOCH: PuzzleEpoch = PuzzleEpoch::new(2023, 6, 12);

/// Digit Party day 1 (day 1008 was 2026-01-05)
pub const DIGIT_PARTY_EPOCH: PuzzleEpoch = PuzzleEpoch::new(2023, 4, 4);

impl PuzzleEpoch {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn origin(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Date of puzzle `index` (1-based). `None` for index 0 or on overflow.
    pub fn date_for(&self, index: u32) -> Option<NaiveDate> {
        let offset = index.checked_sub(1)?;
        self.origin()?.checked_add_days(Days::new(u64::from(offset)))
    }

    /// Puzzle number published on `date`, if the game existed then
    pub fn index_for(&self, date: NaiveDate) -> Option<u32> {
        let days = date.signed_duration_since(self.origin()?).num_days();
        u32::try_from(days).ok()?.checked_add(1)
    }
}

/// Parse a number that may carry thousands separators ("1,661").
pub fn parse_grouped_number(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_puzzle_is_origin() {
        assert_eq!(WORDLE_EPOCH.date_for(1), Some(date(2021, 6, 20)));
        assert_eq!(CONNECTIONS_EPOCH.date_for(1), Some(date(2023, 6, 12)));
        assert_eq!(DIGIT_PARTY_EPOCH.date_for(1), Some(date(2023, 4, 4)));
    }

    #[test]
    fn test_known_puzzles() {
        assert_eq!(WORDLE_EPOCH.date_for(1661), Some(date(2026, 1, 5)));
        assert_eq!(CONNECTIONS_EPOCH.date_for(942), Some(date(2026, 1, 8)));
        assert_eq!(DIGIT_PARTY_EPOCH.date_for(1008), Some(date(2026, 1, 5)));
    }

    #[test]
    fn test_crosses_leap_day() {
        // 2024-02-28 + 1 day must land on the 29th
        let epoch = PuzzleEpoch::new(2024, 2, 28);
        assert_eq!(epoch.date_for(2), Some(date(2024, 2, 29)));
        assert_eq!(epoch.date_for(3), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_rejects_zero_and_overflow() {
        assert_eq!(WORDLE_EPOCH.date_for(0), None);
        assert_eq!(WORDLE_EPOCH.date_for(u32::MAX), None);
        assert_eq!(PuzzleEpoch::new(2023, 2, 30).date_for(1), None);
    }

    #[test]
    fn test_index_for_inverts_date_for() {
        assert_eq!(WORDLE_EPOCH.index_for(date(2026, 1, 5)), Some(1661));
        assert_eq!(WORDLE_EPOCH.index_for(date(2021, 1, 1)), None);
    }

    #[test]
    fn test_grouped_numbers() {
        assert_eq!(parse_grouped_number("1,661"), Some(1661));
        assert_eq!(parse_grouped_number("942"), Some(942));
        assert_eq!(parse_grouped_number(","), None);
        assert_eq!(parse_grouped_number(""), None);
        assert_eq!(parse_grouped_number("99999999999"), None);
    }
}
