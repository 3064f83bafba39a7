//! SQLite-backed goal storage.
//!
//! Provides persistent storage for:
//! - Goal records and their completion history
//! - Calculator state (schedule, streak, pause, multi-activity) as
//!   JSON blobs in a key-value table
//! - Completion statistics (daily and all-time)
//!
//! Writers are not coordinated: state is read, transformed by the
//! pure calculators, and written back. Last write wins.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DatabaseError, Result};
use crate::goal::{Goal, GoalType, Visibility};
use crate::schedule::GoalSchedule;
use crate::streak::{MultiActivityGoal, PauseState, StreakState};

use super::data_dir;

/// Aggregate completion statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_goals: u64,
    pub open_goals: u64,
    pub completed_goals: u64,
    pub total_completions: u64,
    pub today_completions: u64,
}

/// SQLite database for goals, completions, and calculator state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/commitly/commitly.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("commitly.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests and ephemeral runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|source| DatabaseError::OpenFailed {
                path: ":memory:".into(),
                source,
            })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS goals (
                    id           TEXT PRIMARY KEY,
                    title        TEXT NOT NULL,
                    description  TEXT NOT NULL DEFAULT '',
                    goal_type    TEXT NOT NULL,
                    visibility   TEXT NOT NULL,
                    start_date   TEXT NOT NULL,
                    due_date     TEXT,
                    suspended    INTEGER NOT NULL DEFAULT 0,
                    completed_at TEXT,
                    created_at   TEXT NOT NULL,
                    updated_at   TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS completions (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    goal_id      TEXT NOT NULL,
                    activity_id  TEXT,
                    completed_on TEXT NOT NULL,
                    recorded_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_completions_goal_id ON completions(goal_id);
                CREATE INDEX IF NOT EXISTS idx_completions_completed_on ON completions(completed_on);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // ── Goals ────────────────────────────────────────────────────────

    /// Insert a new goal record.
    ///
    /// # Errors
    /// Returns an error if the insert fails (duplicate id included).
    pub fn insert_goal(&self, goal: &Goal) -> Result<()> {
        self.conn.execute(
            "INSERT INTO goals (id, title, description, goal_type, visibility, start_date,
                                due_date, suspended, completed_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                goal.id,
                goal.title,
                goal.description,
                goal.goal_type.as_str(),
                goal.visibility.as_str(),
                goal.start_date.to_string(),
                goal.due_date.map(|d| d.to_string()),
                goal.suspended,
                goal.completed_at.map(|t| t.to_rfc3339()),
                goal.created_at.to_rfc3339(),
                goal.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Overwrite an existing goal record.
    pub fn update_goal(&self, goal: &Goal) -> Result<()> {
        self.conn.execute(
            "UPDATE goals SET title = ?2, description = ?3, goal_type = ?4, visibility = ?5,
                              start_date = ?6, due_date = ?7, suspended = ?8,
                              completed_at = ?9, updated_at = ?10
             WHERE id = ?1",
            params![
                goal.id,
                goal.title,
                goal.description,
                goal.goal_type.as_str(),
                goal.visibility.as_str(),
                goal.start_date.to_string(),
                goal.due_date.map(|d| d.to_string()),
                goal.suspended,
                goal.completed_at.map(|t| t.to_rfc3339()),
                goal.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, goal_type, visibility, start_date, due_date,
                    suspended, completed_at, created_at, updated_at
             FROM goals WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id], row_to_goal);
        match result {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_goals(&self) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, goal_type, visibility, start_date, due_date,
                    suspended, completed_at, created_at, updated_at
             FROM goals ORDER BY created_at",
        )?;
        let rows = stmt.query_map([], row_to_goal)?;
        let mut goals = Vec::new();
        for row in rows {
            goals.push(row?);
        }
        Ok(goals)
    }

    /// Remove a goal and everything hanging off it. Returns whether a
    /// goal row existed.
    pub fn archive_goal(&self, id: &str) -> Result<bool> {
        self.conn
            .execute("DELETE FROM completions WHERE goal_id = ?1", params![id])?;
        self.conn.execute(
            "DELETE FROM kv WHERE key LIKE ?1",
            params![format!("%:{id}")],
        )?;
        let deleted = self
            .conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // ── Completions ──────────────────────────────────────────────────

    /// Record one completion (goal-level, or one activity of a multi
    /// goal).
    pub fn record_completion(
        &self,
        goal_id: &str,
        activity_id: Option<&str>,
        completed_on: NaiveDate,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO completions (goal_id, activity_id, completed_on, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                goal_id,
                activity_id,
                completed_on.to_string(),
                recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn stats_today(&self) -> Result<Stats> {
        let today = Utc::now().date_naive().to_string();
        let today_completions = self.conn.query_row(
            "SELECT COUNT(*) FROM completions WHERE completed_on = ?1",
            params![today],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(Stats {
            today_completions,
            total_completions: today_completions,
            ..self.goal_counts()?
        })
    }

    pub fn stats_all(&self) -> Result<Stats> {
        let today = Utc::now().date_naive().to_string();
        let total_completions = self.conn.query_row(
            "SELECT COUNT(*) FROM completions",
            [],
            |row| row.get::<_, u64>(0),
        )?;
        let today_completions = self.conn.query_row(
            "SELECT COUNT(*) FROM completions WHERE completed_on = ?1",
            params![today],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(Stats {
            total_completions,
            today_completions,
            ..self.goal_counts()?
        })
    }

    fn goal_counts(&self) -> Result<Stats> {
        let (total, completed) = self.conn.query_row(
            "SELECT COUNT(*), COUNT(completed_at) FROM goals",
            [],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        Ok(Stats {
            total_goals: total,
            open_goals: total - completed,
            completed_goals: completed,
            ..Stats::default()
        })
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // ── Calculator state blobs ───────────────────────────────────────

    fn load_state<T: DeserializeOwned>(&self, kind: &str, goal_id: &str) -> Result<Option<T>> {
        match self.kv_get(&format!("{kind}:{goal_id}"))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_state<T: Serialize>(&self, kind: &str, goal_id: &str, value: &T) -> Result<()> {
        self.kv_set(&format!("{kind}:{goal_id}"), &serde_json::to_string(value)?)
    }

    pub fn load_schedule(&self, goal_id: &str) -> Result<Option<GoalSchedule>> {
        self.load_state("schedule", goal_id)
    }

    pub fn save_schedule(&self, goal_id: &str, schedule: &GoalSchedule) -> Result<()> {
        self.save_state("schedule", goal_id, schedule)
    }

    pub fn load_streak(&self, goal_id: &str) -> Result<Option<StreakState>> {
        self.load_state("streak", goal_id)
    }

    pub fn save_streak(&self, goal_id: &str, streak: &StreakState) -> Result<()> {
        self.save_state("streak", goal_id, streak)
    }

    pub fn load_pause(&self, goal_id: &str) -> Result<Option<PauseState>> {
        self.load_state("pause", goal_id)
    }

    pub fn save_pause(&self, goal_id: &str, pause: &PauseState) -> Result<()> {
        self.save_state("pause", goal_id, pause)
    }

    pub fn load_multi(&self, goal_id: &str) -> Result<Option<MultiActivityGoal>> {
        self.load_state("multi", goal_id)
    }

    pub fn save_multi(&self, goal_id: &str, multi: &MultiActivityGoal) -> Result<()> {
        self.save_state("multi", goal_id, multi)
    }

    /// Multi-activity state for every goal that has one.
    pub fn list_multi(&self) -> Result<Vec<MultiActivityGoal>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key LIKE 'multi:%'")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut goals = Vec::new();
        for row in rows {
            goals.push(serde_json::from_str(&row?)?);
        }
        Ok(goals)
    }
}

fn row_to_goal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Goal> {
    let goal_type: String = row.get(3)?;
    let visibility: String = row.get(4)?;
    Ok(Goal {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        goal_type: GoalType::parse(&goal_type)
            .ok_or_else(|| conversion_error(3, &goal_type))?,
        visibility: Visibility::parse(&visibility)
            .ok_or_else(|| conversion_error(4, &visibility))?,
        start_date: parse_date(5, row.get::<_, String>(5)?)?,
        due_date: row
            .get::<_, Option<String>>(6)?
            .map(|s| parse_date(6, s))
            .transpose()?,
        suspended: row.get(7)?,
        completed_at: row
            .get::<_, Option<String>>(8)?
            .map(|s| parse_timestamp(8, s))
            .transpose()?,
        created_at: parse_timestamp(9, row.get::<_, String>(9)?)?,
        updated_at: parse_timestamp(10, row.get::<_, String>(10)?)?,
    })
}

fn parse_date(idx: usize, s: String) -> rusqlite::Result<NaiveDate> {
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(idx: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn conversion_error(idx: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("unrecognized value '{value}'").into(),
    )
}
