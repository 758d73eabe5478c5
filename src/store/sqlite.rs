use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::{GameType, Score, ScoreData};
use crate::error::{Result, ScoreboardError};
use crate::store::{ScoreFilter, ScoreStore, StoreStats};

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, game_type, game_date, score_data, raw_paste, created_at FROM scores";

/// SQLite-based score store
///
/// Schema:
/// ```sql
/// CREATE TABLE scores (
///     id TEXT PRIMARY KEY,
///     user_id TEXT NOT NULL,
///     game_type TEXT NOT NULL,
///     game_date TEXT NOT NULL,      -- YYYY-MM-DD
///     score_data TEXT NOT NULL,     -- ScoreData JSON
///     sort_score INTEGER NOT NULL,
///     raw_paste TEXT NOT NULL DEFAULT '',
///     created_at TEXT NOT NULL      -- RFC 3339, nanosecond precision
/// );
/// CREATE UNIQUE INDEX idx_first_attempt ON scores(user_id, game_type, game_date);
/// ```
pub struct SqliteScoreStore {
    conn: Arc<Mutex<Connection>>,
}

/// Raw column values, converted outside the rusqlite row closure
struct ScoreRow {
    id: String,
    user_id: String,
    game_type: String,
    game_date: String,
    score_data: String,
    raw_paste: String,
    created_at: String,
}

impl ScoreRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            game_type: row.get(2)?,
            game_date: row.get(3)?,
            score_data: row.get(4)?,
            raw_paste: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_score(self) -> Result<Score> {
        let score_data = ScoreData::from_json(&self.score_data)?;
        let game_type: GameType = self.game_type.parse()?;
        let game_date = NaiveDate::parse_from_str(&self.game_date, "%Y-%m-%d")
            .map_err(|e| ScoreboardError::Storage(format!("bad game_date '{}': {}", self.game_date, e)))?;
        let created_at = parse_timestamp(&self.created_at)?;

        Ok(Score {
            id: self.id,
            user_id: self.user_id,
            game_type,
            game_date,
            score_data,
            raw_paste: self.raw_paste,
            created_at,
        })
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    // Fixed width, so MIN/MAX and range filters work on the text column
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ScoreboardError::Storage(format!("bad timestamp '{}': {}", raw, e)))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl SqliteScoreStore {
    /// Open (or create) the store at `db_path`; `:memory:` for a throwaway store
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS scores (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                game_type TEXT NOT NULL,
                game_date TEXT NOT NULL,
                score_data TEXT NOT NULL,
                sort_score INTEGER NOT NULL,
                raw_paste TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_first_attempt
             ON scores(user_id, game_type, game_date)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_game_date ON scores(game_type, game_date)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ScoreboardError::Storage("connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn insert(&self, score: &Score) -> Result<()> {
        let conn = self.conn()?;
        let score_json = score.score_data.to_json()?;

        let inserted = conn.execute(
            "INSERT INTO scores (id, user_id, game_type, game_date, score_data, sort_score, raw_paste, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                score.id,
                score.user_id,
                score.game_type.as_str(),
                score.score_data.game_date_string(),
                score_json,
                score.score_data.sort_score,
                score.raw_paste,
                format_timestamp(&score.created_at),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(ScoreboardError::DuplicateSubmission {
                user_id: score.user_id.clone(),
                game_type: score.game_type.to_string(),
                game_date: score.score_data.game_date_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, user_id: &str, game_type: GameType, game_date: NaiveDate) -> Result<Option<Score>> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                &format!(
                    "{} WHERE user_id = ?1 AND game_type = ?2 AND game_date = ?3",
                    SELECT_COLUMNS
                ),
                params![user_id, game_type.as_str(), game_date.format("%Y-%m-%d").to_string()],
                ScoreRow::from_row,
            )
            .optional()?;

        row.map(ScoreRow::into_score).transpose()
    }

    async fn list(&self, filter: &ScoreFilter) -> Result<Vec<Score>> {
        let mut sql = format!("{} WHERE game_type = ?", SELECT_COLUMNS);
        let mut args: Vec<String> = vec![filter.game_type.as_str().to_string()];

        if let Some(date) = filter.game_date {
            sql.push_str(" AND game_date = ?");
            args.push(date.format("%Y-%m-%d").to_string());
        }

        if let Some(members) = &filter.members {
            if members.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; members.len()].join(", ");
            sql.push_str(&format!(" AND user_id IN ({})", placeholders));
            args.extend(members.iter().cloned());
        }

        // Leaderboard order, with submission order for ties
        sql.push_str(" ORDER BY game_date DESC, sort_score ASC, created_at ASC, rowid ASC");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), ScoreRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(ScoreRow::into_score).collect()
    }

    async fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn()?;

        let total_scores: u64 = conn.query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))?;

        let distinct_users: u64 =
            conn.query_row("SELECT COUNT(DISTINCT user_id) FROM scores", [], |row| row.get(0))?;

        let mut by_game = BTreeMap::new();
        let mut stmt = conn.prepare("SELECT game_type, COUNT(*) FROM scores GROUP BY game_type")?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for (tag, count) in counts {
            match tag.parse::<GameType>() {
                Ok(game_type) => {
                    by_game.insert(game_type, count);
                }
                Err(_) => tracing::warn!("Unknown game type in store: {}", tag),
            }
        }

        let (oldest, newest): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(created_at), MAX(created_at) FROM scores",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(StoreStats {
            total_scores,
            by_game,
            distinct_users,
            oldest_entry: oldest.as_deref().map(parse_timestamp).transpose()?,
            newest_entry: newest.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    async fn cleanup(&self, max_age_days: i64) -> Result<u64> {
        if max_age_days < 0 {
            return Err(ScoreboardError::InvalidInput(format!(
                "max age must not be negative: {} days",
                max_age_days
            )));
        }

        let cutoff = chrono::Duration::try_days(max_age_days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| {
                ScoreboardError::InvalidInput(format!("max age out of range: {} days", max_age_days))
            })?;

        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM scores WHERE created_at < ?",
            params![format_timestamp(&cutoff)],
        )?;

        Ok(deleted as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::try_parse_score;

    fn parsed(text: &str) -> ScoreData {
        try_parse_score(text).unwrap().score_data
    }

    fn wordle(guesses: u32) -> ScoreData {
        parsed(&format!("Wordle 1,661 {}/6", guesses))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_store_create() {
        let store = SqliteScoreStore::new(":memory:").await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_scores, 0);
        assert!(stats.oldest_entry.is_none());
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = SqliteScoreStore::new(":memory:").await.unwrap();
        let score = Score::new("google:1", wordle(4), "Wordle 1,661 4/6");
        store.insert(&score).await.unwrap();

        let found = store
            .find("google:1", GameType::Wordle, date(2026, 1, 5))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, score);

        let missing = store
            .find("google:1", GameType::Connections, date(2026, 1, 5))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_first_attempt_only() {
        let store = SqliteScoreStore::new(":memory:").await.unwrap();
        store.insert(&Score::new("u", wordle(4), "")).await.unwrap();

        let second = store.insert(&Score::new("u", wordle(2), "")).await;
        assert!(matches!(second, Err(ScoreboardError::DuplicateSubmission { .. })));

        // Another user, or another game on the same day, is fine
        store.insert(&Score::new("v", wordle(2), "")).await.unwrap();
        store
            .insert(&Score::new("u", parsed("day 1008: 194 points 95%\ndigit.party"), ""))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_filters() {
        let store = SqliteScoreStore::new(":memory:").await.unwrap();
        store.insert(&Score::new("a", wordle(3), "")).await.unwrap();
        store.insert(&Score::new("b", wordle(5), "")).await.unwrap();
        store.insert(&Score::new("c", parsed("Wordle 1,660 2/6"), "")).await.unwrap();
        store
            .insert(&Score::new("a", parsed("Connections\nPuzzle #942\n🟩🟩🟩🟩"), ""))
            .await
            .unwrap();

        let all = store.list(&ScoreFilter::global(GameType::Wordle)).await.unwrap();
        assert_eq!(all.len(), 3);

        let day = store
            .list(&ScoreFilter::global(GameType::Wordle).on(date(2026, 1, 5)))
            .await
            .unwrap();
        assert_eq!(day.len(), 2);

        let members = store
            .list(&ScoreFilter::global(GameType::Wordle).members(vec!["a".into(), "c".into()]))
            .await
            .unwrap();
        assert_eq!(members.len(), 2);

        let nobody = store
            .list(&ScoreFilter::global(GameType::Wordle).members(Vec::new()))
            .await
            .unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let store = SqliteScoreStore::new(":memory:").await.unwrap();
        store.insert(&Score::new("a", wordle(3), "")).await.unwrap();
        store.insert(&Score::new("b", wordle(5), "")).await.unwrap();
        store
            .insert(&Score::new("a", parsed("Connections\nPuzzle #942\n🟩🟩🟩🟩"), ""))
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_scores, 3);
        assert_eq!(stats.distinct_users, 2);
        assert_eq!(stats.by_game.get(&GameType::Wordle), Some(&2));
        assert_eq!(stats.by_game.get(&GameType::Connections), Some(&1));
        assert!(stats.oldest_entry.unwrap() <= stats.newest_entry.unwrap());
    }

    #[tokio::test]
    async fn test_cleanup() {
        let store = SqliteScoreStore::new(":memory:").await.unwrap();
        store.insert(&Score::new("a", wordle(3), "")).await.unwrap();

        assert_eq!(store.cleanup(30).await.unwrap(), 0);

        // Entries older than 0 days: everything
        assert_eq!(store.cleanup(0).await.unwrap(), 1);
        assert_eq!(store.stats().await.unwrap().total_scores, 0);
    }

    #[tokio::test]
    async fn test_cleanup_rejects_bad_age() {
        let store = SqliteScoreStore::new(":memory:").await.unwrap();
        store.insert(&Score::new("a", wordle(3), "")).await.unwrap();

        let negative = store.cleanup(-1).await;
        assert!(matches!(negative, Err(ScoreboardError::InvalidInput(_))));

        let too_old = store.cleanup(200_000_000).await;
        assert!(matches!(too_old, Err(ScoreboardError::InvalidInput(_))));

        let huge = store.cleanup(i64::MAX).await;
        assert!(matches!(huge, Err(ScoreboardError::InvalidInput(_))));

        assert_eq!(store.stats().await.unwrap().total_scores, 1);
    }

    #[tokio::test]
    async fn test_list_order() {
        let store = SqliteScoreStore::new(":memory:").await.unwrap();
        store.insert(&Score::new("a", wordle(3), "")).await.unwrap();
        store.insert(&Score::new("b", parsed("Wordle 1,660 2/6"), "")).await.unwrap();
        store.insert(&Score::new("c", wordle(5), "")).await.unwrap();
        store.insert(&Score::new("d", wordle(3), "")).await.unwrap();

        let listed = store.list(&ScoreFilter::global(GameType::Wordle)).await.unwrap();
        let users: Vec<_> = listed.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(users, vec!["c", "a", "d", "b"]);
    }
}
