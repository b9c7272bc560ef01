use rusqlite::params;

use super::ScoreStore;
use crate::types::{LeaderboardRow, NewScore};

impl ScoreStore {
    /// Append one accepted submission.
    pub fn insert(&self, score: &NewScore) -> Result<(), String> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO scores (game, player, score) VALUES (?1, ?2, ?3)",
            params![score.game, score.player, score.score as i64],
        )
        .map_err(|e| format!("insert score failed: {e}"))?;
        Ok(())
    }

    /// Highest `limit` scores for `game`; ties keep submission order.
    pub fn top(&self, game: &str, limit: u32) -> Result<Vec<LeaderboardRow>, String> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT player, score, created_at FROM scores
                 WHERE game = ?1
                 ORDER BY score DESC, id ASC
                 LIMIT ?2",
            )
            .map_err(|e| format!("prepare top scores failed: {e}"))?;

        let rows = stmt
            .query_map(params![game, i64::from(limit)], |row| {
                let score: i64 = row.get(1)?;
                Ok(LeaderboardRow {
                    player: row.get(0)?,
                    score: score.max(0) as u64,
                    created_at: row.get(2)?,
                })
            })
            .map_err(|e| format!("query top scores failed: {e}"))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("read score row failed: {e}"))
    }

    pub fn count(&self, game: &str) -> Result<u64, String> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM scores WHERE game = ?1",
                params![game],
                |row| row.get(0),
            )
            .map_err(|e| format!("count scores failed: {e}"))?;
        Ok(count.max(0) as u64)
    }
}
