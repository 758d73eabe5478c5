use regex::Regex;
use std::sync::LazyLock;

use crate::core::{ConnectionsScore, GamePayload, GameType, MistakeSource, ScoreData};
use crate::parsers::epoch::{parse_grouped_number, PuzzleEpoch, CONNECTIONS_EPOCH};
use crate::parsers::ScoreParser;

/// Category colours
const CATEGORY_BLOCKS: [char; 4] = ['🟨', '🟩', '🟦', '🟪'];

/// Marker some clients use for a wrong guess
const WRONG_BLOCK: char = '⬛';

/// Lines searched for "Puzzle #N" after the title line
const PUZZLE_NUMBER_LOOKAHEAD: usize = 2;

static PUZZLE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9][0-9,]*)").expect("valid puzzle number regex"));

static MISTAKES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*mistakes?").expect("valid mistakes regex")
});

// Four or more blocks in a row; ⬛ may carry a variation selector
static GRID_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[🟨🟩🟦🟪⬛]\x{FE0F}?){4,}").expect("valid grid row regex")
});

fn is_block(c: char) -> bool {
    c == WRONG_BLOCK || CATEGORY_BLOCKS.contains(&c)
}

/// Parser for the NYT Connections share text
#[derive(Debug, Clone)]
pub struct ConnectionsParser {
    epoch: PuzzleEpoch,
}

impl ConnectionsParser {
    pub fn new() -> Self {
        Self::with_epoch(CONNECTIONS_EPOCH)
    }

    pub fn with_epoch(epoch: PuzzleEpoch) -> Self {
        Self { epoch }
    }

    fn puzzle_number(lines: &[&str], title: usize) -> Option<u32> {
        let end = (title + PUZZLE_NUMBER_LOOKAHEAD).min(lines.len().saturating_sub(1));
        let raw = lines[title..=end]
            .iter()
            .find_map(|line| PUZZLE_NUMBER_RE.captures(line))?;
        parse_grouped_number(&raw[1])
    }

    /// Explicit "N mistakes" wins; otherwise count imperfect grid rows.
    fn mistakes(text: &str, lines: &[&str]) -> Option<(u32, MistakeSource)> {
        if let Some(caps) = MISTAKES_RE.captures(text) {
            let mistakes: u32 = caps[1].parse().ok()?;
            return Some((mistakes, MistakeSource::Explicit));
        }

        let rows: Vec<[char; 4]> = lines
            .iter()
            .filter(|line| GRID_ROW_RE.is_match(line))
            .filter_map(|line| grid_row(line))
            .collect();

        if rows.is_empty() {
            return Some((0, MistakeSource::NoGrid));
        }

        let solved = rows.iter().filter(|row| is_solved(row)).count();
        let wrong = rows.len() - solved;
        let mistakes = u32::try_from(wrong).ok()?;

        // A finished game ends on the fourth solve or the fourth mistake
        let source = if solved == 4 || wrong == 4 {
            MistakeSource::Grid
        } else {
            MistakeSource::PartialGrid
        };
        tracing::debug!(
            "Connections grid: {} rows, {} solved, source {:?}",
            rows.len(),
            solved,
            source
        );

        Some((mistakes, source))
    }
}

/// First four blocks of a grid line
fn grid_row(line: &str) -> Option<[char; 4]> {
    let mut blocks = line.chars().filter(|c| is_block(*c));
    Some([blocks.next()?, blocks.next()?, blocks.next()?, blocks.next()?])
}

fn is_solved(row: &[char; 4]) -> bool {
    row[0] != WRONG_BLOCK && row.iter().all(|c| *c == row[0])
}

impl Default for ConnectionsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreParser for ConnectionsParser {
    fn try_parse(&self, text: &str) -> Option<ScoreData> {
        let lines: Vec<&str> = text.trim().lines().collect();
        let title = lines
            .iter()
            .position(|line| line.to_lowercase().contains("connections"))?;

        let puzzle_number = Self::puzzle_number(&lines, title)?;
        let game_date = self.epoch.date_for(puzzle_number)?;
        let (mistakes, mistake_source) = Self::mistakes(text, &lines)?;

        Some(ScoreData::new(
            game_date,
            GamePayload::Connections(ConnectionsScore {
                puzzle_number,
                mistakes,
                mistake_source,
            }),
        ))
    }

    fn game_type(&self) -> GameType {
        GameType::Connections
    }
}
