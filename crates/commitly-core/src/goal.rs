//! Goal model.
//!
//! A goal is a plain record: the calculators read it, produce a new
//! value, and the caller persists the result. Nothing here owns
//! runtime state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StateError;

/// Kind of goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// One-off task
    Single,
    /// Checklist of activities tracked together
    Multi,
    /// Repeats on a schedule pattern
    Recurring,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Single => "single",
            GoalType::Multi => "multi",
            GoalType::Recurring => "recurring",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(GoalType::Single),
            "multi" => Some(GoalType::Multi),
            "recurring" => Some(GoalType::Recurring),
            _ => None,
        }
    }
}

/// Who can see a goal. Delivery of the social surface lives elsewhere;
/// the flag is carried as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    /// Visible to accountability partners only
    Partners,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Partners => "partners",
            Visibility::Public => "public",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "private" => Some(Visibility::Private),
            "partners" => Some(Visibility::Partners),
            "public" => Some(Visibility::Public),
            _ => None,
        }
    }
}

/// A tracked goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub goal_type: GoalType,
    pub visibility: Visibility,
    /// First day the goal can be active.
    pub start_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    /// Suspended goals are skipped by the due-date checker.
    #[serde(default)]
    pub suspended: bool,
    /// Set once, when the goal reaches its end condition. A goal with
    /// `completed_at` is terminal: no further streak or schedule
    /// mutation is accepted.
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Create a goal with a fresh id, starting on `start_date`.
    pub fn new(title: &str, goal_type: GoalType, visibility: Visibility, start_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: String::new(),
            goal_type,
            visibility,
            start_date,
            due_date: None,
            suspended: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Reject mutation of a terminal goal.
    pub fn ensure_mutable(&self) -> Result<(), StateError> {
        if self.is_terminal() {
            Err(StateError::GoalCompleted(self.id.clone()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_goal_is_not_terminal() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let goal = Goal::new("Read daily", GoalType::Recurring, Visibility::Private, date);
        assert!(!goal.is_terminal());
        assert!(goal.ensure_mutable().is_ok());
    }

    #[test]
    fn completed_goal_rejects_mutation() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut goal = Goal::new("Ship it", GoalType::Single, Visibility::Public, date);
        goal.completed_at = Some(Utc::now());
        assert_eq!(
            goal.ensure_mutable(),
            Err(StateError::GoalCompleted(goal.id.clone()))
        );
    }

    #[test]
    fn goal_serialization_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let goal = Goal::new("Run", GoalType::Multi, Visibility::Partners, date);
        let json = serde_json::to_string(&goal).unwrap();
        let decoded: Goal = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id, goal.id);
        assert_eq!(decoded.goal_type, GoalType::Multi);
        assert_eq!(decoded.visibility, Visibility::Partners);
    }

    #[test]
    fn type_strings_roundtrip() {
        for t in [GoalType::Single, GoalType::Multi, GoalType::Recurring] {
            assert_eq!(GoalType::parse(t.as_str()), Some(t));
        }
        for v in [Visibility::Private, Visibility::Partners, Visibility::Public] {
            assert_eq!(Visibility::parse(v.as_str()), Some(v));
        }
        assert_eq!(GoalType::parse("weekly"), None);
    }
}
