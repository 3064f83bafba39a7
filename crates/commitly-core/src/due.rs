//! Due-date checking.
//!
//! `DueDateChecker` is a constructed value threaded through call
//! sites, not a global. `check` is pure; `run` is the polling task
//! the `watch` command drives.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::events::Event;
use crate::goal::Goal;
use crate::storage::Database;

/// Flags goals whose deadline is inside the lead window.
#[derive(Debug, Clone, Copy)]
pub struct DueDateChecker {
    /// Days before the due date at which a goal counts as "due soon".
    pub lead_days: u32,
}

impl DueDateChecker {
    pub fn new(lead_days: u32) -> Self {
        Self { lead_days }
    }

    /// Return a `GoalDueSoon` event for every unfinished, unsuspended
    /// goal whose due date falls within the lead window as of `now`.
    pub fn check(&self, goals: &[Goal], now: DateTime<Utc>) -> Vec<Event> {
        let today = now.date_naive();
        goals
            .iter()
            .filter(|g| !g.is_terminal() && !g.suspended)
            .filter_map(|g| {
                let due = g.due_date?;
                let days_left = (due - today).num_days();
                if days_left >= 0 && days_left <= i64::from(self.lead_days) {
                    Some(Event::GoalDueSoon {
                        goal_id: g.id.clone(),
                        title: g.title.clone(),
                        due_date: due,
                        days_left,
                        at: now,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Poll the store on `period`, handing each due-soon event to
    /// `on_event`. Runs until the task is dropped.
    pub async fn run(
        &self,
        db: &Database,
        period: std::time::Duration,
        mut on_event: impl FnMut(&Event),
    ) -> Result<()> {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let goals = db.list_goals()?;
            for event in self.check(&goals, Utc::now()) {
                on_event(&event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{GoalType, Visibility};
    use chrono::NaiveDate;

    fn goal_due(due: Option<NaiveDate>) -> Goal {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut goal = Goal::new("Ship", GoalType::Single, Visibility::Private, start);
        goal.due_date = due;
        goal
    }

    fn at_noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn flags_goals_inside_lead_window() {
        let checker = DueDateChecker::new(1);
        let now = at_noon(2025, 6, 10);
        let goals = vec![
            goal_due(Some(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())),
            goal_due(Some(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap())),
            goal_due(Some(NaiveDate::from_ymd_opt(2025, 6, 13).unwrap())),
            goal_due(None),
        ];
        let events = checker.check(&goals, now);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn overdue_and_suspended_goals_are_skipped() {
        let checker = DueDateChecker::new(3);
        let now = at_noon(2025, 6, 10);

        let overdue = goal_due(Some(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()));
        assert!(checker.check(&[overdue], now).is_empty());

        let mut suspended = goal_due(Some(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()));
        suspended.suspended = true;
        assert!(checker.check(&[suspended], now).is_empty());

        let mut done = goal_due(Some(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()));
        done.completed_at = Some(now);
        assert!(checker.check(&[done], now).is_empty());
    }

    #[test]
    fn days_left_is_reported() {
        let checker = DueDateChecker::new(2);
        let now = at_noon(2025, 6, 10);
        let goals = vec![goal_due(Some(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()))];
        match checker.check(&goals, now).as_slice() {
            [Event::GoalDueSoon { days_left, .. }] => assert_eq!(*days_left, 2),
            other => panic!("Expected one GoalDueSoon, got {other:?}"),
        }
    }
}
