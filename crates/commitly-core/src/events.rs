use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::goal::GoalType;

/// Every state change in the system produces an Event. The CLI prints
/// them; a delivery layer would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GoalCreated {
        goal_id: String,
        title: String,
        goal_type: GoalType,
        at: DateTime<Utc>,
    },
    GoalArchived {
        goal_id: String,
        at: DateTime<Utc>,
    },
    CheckinRecorded {
        goal_id: String,
        date: NaiveDate,
        completed: bool,
        streak: u32,
        completions: u32,
        at: DateTime<Utc>,
    },
    StreakExtended {
        goal_id: String,
        current_streak: u32,
        longest_streak: u32,
        at: DateTime<Utc>,
    },
    StreakBroken {
        goal_id: String,
        previous_streak: u32,
        at: DateTime<Utc>,
    },
    StreakFrozen {
        goal_id: String,
        until: NaiveDate,
        at: DateTime<Utc>,
    },
    GoalPaused {
        goal_id: String,
        reason: Option<String>,
        streak_preserved: bool,
        at: DateTime<Utc>,
    },
    GoalResumed {
        goal_id: String,
        pause_duration_days: i64,
        streak_preserved: bool,
        at: DateTime<Utc>,
    },
    GoalCompleted {
        goal_id: String,
        completions: u32,
        at: DateTime<Utc>,
    },
    /// Raised by the due-date checker while the deadline is inside the
    /// configured lead window.
    GoalDueSoon {
        goal_id: String,
        title: String,
        due_date: NaiveDate,
        days_left: i64,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_by_type() {
        let event = Event::StreakBroken {
            goal_id: "g1".into(),
            previous_streak: 12,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StreakBroken");
        assert_eq!(json["previous_streak"], 12);
    }
}
