//! Streak aggregation for multi-activity goals.
//!
//! A multi-activity goal is a daily checklist: each activity keeps its
//! own streak, and a requirement policy decides when the day counts
//! for the goal as a whole.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One item of a multi-activity checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

/// Per-activity streak counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStreak {
    pub activity_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completion_date: Option<NaiveDate>,
}

impl ActivityStreak {
    fn new(activity_id: &str) -> Self {
        Self {
            activity_id: activity_id.to_string(),
            current_streak: 0,
            longest_streak: 0,
            last_completion_date: None,
        }
    }
}

/// When does a day count for the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequirementPolicy {
    /// Every activity completed.
    All,
    /// At least one activity completed.
    Any,
    /// At least `count` activities completed.
    Minimum { count: u32 },
    /// At least ceil(total * required / 100) activities completed.
    Percentage { required: u8 },
}

/// A multi-activity goal's aggregate streak state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiActivityGoal {
    pub goal_id: String,
    pub activities: Vec<Activity>,
    pub activity_streaks: Vec<ActivityStreak>,
    pub policy: RequirementPolicy,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completion_date: Option<NaiveDate>,
}

impl MultiActivityGoal {
    pub fn new(goal_id: &str, activities: Vec<Activity>, policy: RequirementPolicy) -> Self {
        let activity_streaks = activities
            .iter()
            .map(|a| ActivityStreak::new(&a.id))
            .collect();
        Self {
            goal_id: goal_id.to_string(),
            activities,
            activity_streaks,
            policy,
            current_streak: 0,
            longest_streak: 0,
            last_completion_date: None,
        }
    }

    /// Add an activity with a zeroed streak.
    pub fn add_activity(&mut self, activity: Activity) {
        self.activity_streaks.push(ActivityStreak::new(&activity.id));
        self.activities.push(activity);
    }

    pub fn has_activity(&self, activity_id: &str) -> bool {
        self.activities.iter().any(|a| a.id == activity_id)
    }

    /// Ids in `completed` that actually belong to this goal.
    fn completed_count(&self, completed: &[String]) -> usize {
        self.activities
            .iter()
            .filter(|a| completed.contains(&a.id))
            .count()
    }

    /// Whether `completed` satisfies the requirement policy for one
    /// day. Ids that do not belong to the goal never count.
    pub fn policy_met(&self, completed: &[String]) -> bool {
        let total = self.activities.len();
        if total == 0 {
            return false;
        }
        let done = self.completed_count(completed);
        match self.policy {
            RequirementPolicy::All => done == total,
            RequirementPolicy::Any => done >= 1,
            RequirementPolicy::Minimum { count } => done >= count as usize,
            RequirementPolicy::Percentage { required } => {
                let needed = (total * usize::from(required)).div_ceil(100);
                done >= needed
            }
        }
    }

    /// Advance every activity's streak independently for `date`.
    ///
    /// A completed activity continues when its prior completion was
    /// exactly one calendar day earlier, else restarts at 1. An
    /// untouched activity keeps its number unless a completion was
    /// expected (prior completion exactly yesterday), which resets it
    /// to 0.
    pub fn update_activity_streaks(&self, date: NaiveDate, completed: &[String]) -> Self {
        let mut next = self.clone();
        let yesterday = date.pred_opt();
        for streak in &mut next.activity_streaks {
            let done = completed.contains(&streak.activity_id);
            let expected = yesterday.is_some() && streak.last_completion_date == yesterday;
            if done {
                streak.current_streak = if expected { streak.current_streak + 1 } else { 1 };
                streak.longest_streak = streak.longest_streak.max(streak.current_streak);
                streak.last_completion_date = Some(date);
            } else if expected {
                streak.current_streak = 0;
            }
        }
        next
    }

    /// Advance the goal-level streak for `date`.
    ///
    /// Continuation follows the same consecutive-day rule as the
    /// activities. An unmet day clears the goal streak outright,
    /// which is harsher than the per-activity rule.
    pub fn update_goal_streak(&self, date: NaiveDate, completed: &[String]) -> Self {
        let mut next = self.clone();
        if next.policy_met(completed) {
            let yesterday = date.pred_opt();
            let consecutive = yesterday.is_some() && next.last_completion_date == yesterday;
            next.current_streak = if consecutive { next.current_streak + 1 } else { 1 };
            next.longest_streak = next.longest_streak.max(next.current_streak);
            next.last_completion_date = Some(date);
        } else {
            next.current_streak = 0;
        }
        next
    }

    /// Apply one day's checklist: activities first, then the goal.
    pub fn record_day(&self, date: NaiveDate, completed: &[String]) -> Self {
        self.update_activity_streaks(date, completed)
            .update_goal_streak(date, completed)
    }
}

/// Cross-goal existence check: 1 when any goal carries a live streak
/// dated exactly `today`, else 0. A coarse flag, not a count.
pub fn overall_streak(goals: &[MultiActivityGoal], today: NaiveDate) -> u32 {
    let live = goals
        .iter()
        .any(|g| g.current_streak > 0 && g.last_completion_date == Some(today));
    u32::from(live)
}
