use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};

use crate::domain::entities::{LeaderboardEntry, MatchRecord, PlayerStats};
use crate::domain::repositories::{RepositoryError, StatsRepository};
use crate::domain::value_objects::{Difficulty, TurnRecord, Winner};

/// SQLite implementation of StatsRepository
pub struct SqliteStatsRepository {
    pool: SqlitePool,
}

impl SqliteStatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn db_err(e: sqlx::Error) -> RepositoryError {
        RepositoryError::Database(e.to_string())
    }

    fn count(row: &SqliteRow, column: &str) -> Result<u32, RepositoryError> {
        let value: i64 = row.try_get(column).map_err(Self::db_err)?;
        u32::try_from(value)
            .map_err(|_| RepositoryError::Corrupt(format!("{} out of range: {}", column, value)))
    }

    fn row_to_stats(row: &SqliteRow) -> Result<PlayerStats, RepositoryError> {
        Ok(PlayerStats {
            name: row.try_get("name").map_err(Self::db_err)?,
            matches_played: Self::count(row, "matches_played")?,
            wins: Self::count(row, "wins")?,
            losses: Self::count(row, "losses")?,
            ties: Self::count(row, "ties")?,
            total_runs: Self::count(row, "total_runs")?,
            high_score: Self::count(row, "high_score")?,
        })
    }

    fn row_to_match(row: &SqliteRow) -> Result<MatchRecord, RepositoryError> {
        let difficulty_str: String = row.try_get("difficulty").map_err(Self::db_err)?;
        let winner_str: String = row.try_get("winner").map_err(Self::db_err)?;
        let history_json: String = row.try_get("history").map_err(Self::db_err)?;

        let history: Vec<TurnRecord> = serde_json::from_str(&history_json)
            .map_err(|e| RepositoryError::Corrupt(format!("match history: {}", e)))?;

        Ok(MatchRecord {
            id: row.try_get("id").map_err(Self::db_err)?,
            player_name: row.try_get("player_name").map_err(Self::db_err)?,
            difficulty: Difficulty::from_str(&difficulty_str).ok_or_else(|| {
                RepositoryError::Corrupt(format!("unknown difficulty: {}", difficulty_str))
            })?,
            user_score: Self::count(row, "user_score")?,
            computer_score: Self::count(row, "computer_score")?,
            target: Self::count(row, "target")?,
            winner: Winner::from_str(&winner_str)
                .ok_or_else(|| RepositoryError::Corrupt(format!("unknown winner: {}", winner_str)))?,
            history,
            played_at: row.try_get("played_at").map_err(Self::db_err)?,
        })
    }

    async fn upsert_stats<'e, E>(executor: E, stats: &PlayerStats) -> Result<(), RepositoryError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO player_stats (name, matches_played, wins, losses, ties, total_runs, high_score, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                matches_played = excluded.matches_played,
                wins = excluded.wins,
                losses = excluded.losses,
                ties = excluded.ties,
                total_runs = excluded.total_runs,
                high_score = excluded.high_score,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&stats.name)
        .bind(i64::from(stats.matches_played))
        .bind(i64::from(stats.wins))
        .bind(i64::from(stats.losses))
        .bind(i64::from(stats.ties))
        .bind(i64::from(stats.total_runs))
        .bind(i64::from(stats.high_score))
        .bind(now)
        .execute(executor)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }

    async fn insert_match<'e, E>(executor: E, record: &MatchRecord) -> Result<(), RepositoryError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let history = serde_json::to_string(&record.history)
            .map_err(|e| RepositoryError::Corrupt(format!("match history: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO matches (id, player_name, difficulty, user_score, computer_score, target, winner, history, played_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.player_name)
        .bind(record.difficulty.as_str())
        .bind(i64::from(record.user_score))
        .bind(i64::from(record.computer_score))
        .bind(i64::from(record.target))
        .bind(record.winner.as_str())
        .bind(history)
        .bind(record.played_at)
        .execute(executor)
        .await
        .map_err(Self::db_err)?;

        Ok(())
    }
}

#[async_trait]
impl StatsRepository for SqliteStatsRepository {
    async fn init(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS player_stats (
                name TEXT PRIMARY KEY,
                matches_played INTEGER NOT NULL DEFAULT 0,
                wins INTEGER NOT NULL DEFAULT 0,
                losses INTEGER NOT NULL DEFAULT 0,
                ties INTEGER NOT NULL DEFAULT 0,
                total_runs INTEGER NOT NULL DEFAULT 0,
                high_score INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS matches (
                id TEXT PRIMARY KEY,
                player_name TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                user_score INTEGER NOT NULL,
                computer_score INTEGER NOT NULL,
                target INTEGER NOT NULL,
                winner TEXT NOT NULL,
                history TEXT NOT NULL,
                played_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_matches_player ON matches (player_name, played_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(Self::db_err)?;

        tracing::debug!("Stats tables ready");
        Ok(())
    }

    async fn get_stats(&self, name: &str) -> Result<PlayerStats, RepositoryError> {
        let row = sqlx::query("SELECT * FROM player_stats WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::db_err)?;

        match row {
            Some(row) => Self::row_to_stats(&row),
            None => Ok(PlayerStats::new(name)),
        }
    }

    async fn save_stats(&self, stats: &PlayerStats) -> Result<(), RepositoryError> {
        Self::upsert_stats(&self.pool, stats).await
    }

    async fn get_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM player_stats
            WHERE matches_played > 0
            ORDER BY high_score DESC, wins DESC, name ASC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err)?;

        rows.iter()
            .map(|row| Self::row_to_stats(row).map(|stats| LeaderboardEntry::from(&stats)))
            .collect()
    }

    async fn save_match(&self, record: &MatchRecord) -> Result<(), RepositoryError> {
        Self::insert_match(&self.pool, record).await
    }

    async fn record_match(
        &self,
        stats: &PlayerStats,
        record: &MatchRecord,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(Self::db_err)?;

        Self::upsert_stats(&mut *tx, stats).await?;
        Self::insert_match(&mut *tx, record).await?;

        // Dropping the transaction on an early return rolls both writes back
        tx.commit().await.map_err(Self::db_err)?;
        Ok(())
    }

    async fn recent_matches(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<MatchRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM matches WHERE player_name = ? ORDER BY played_at DESC, rowid DESC LIMIT ?",
        )
        .bind(name)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(Self::db_err)?;

        rows.iter().map(Self::row_to_match).collect()
    }
}
