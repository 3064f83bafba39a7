//! Pause and resume for goals.
//!
//! Pausing suspends a goal without archiving it. The owner decides at
//! pause time whether the streak survives; resuming settles that
//! choice and records how long the goal sat idle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::streak::recovery::StreakState;

/// Pause lifecycle state for one goal. `resumed_at` is only ever set
/// on a paused-to-active transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseState {
    pub is_paused: bool,
    pub paused_at: Option<NaiveDate>,
    pub resumed_at: Option<NaiveDate>,
    #[serde(default)]
    pub reason: Option<String>,
    /// Whether the streak survives the pause.
    pub streak_preserved: bool,
    /// Whole days spent paused, filled in on resume.
    pub pause_duration_days: Option<i64>,
}

/// Pause limits, from configuration. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PausePolicy {
    #[serde(default)]
    pub max_pause_days: Option<u32>,
}

/// What pause operations are currently legal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseStatus {
    pub can_pause: bool,
    pub can_resume: bool,
    /// Days left before the configured maximum runs out; `None` when
    /// not paused or no maximum is set.
    pub remaining_pause_days: Option<i64>,
}

impl PauseState {
    /// Pause the goal as of `today`.
    ///
    /// Errors when already paused.
    pub fn pause(
        &self,
        today: NaiveDate,
        reason: Option<String>,
        preserve_streak: bool,
    ) -> Result<PauseState, StateError> {
        if self.is_paused {
            return Err(StateError::AlreadyPaused);
        }
        Ok(PauseState {
            is_paused: true,
            paused_at: Some(today),
            resumed_at: None,
            reason,
            streak_preserved: preserve_streak,
            pause_duration_days: None,
        })
    }

    /// Resume the goal as of `today`, settling the streak.
    ///
    /// Errors when not paused. When the streak was not preserved, the
    /// current streak and its recovery counters are zeroed; when
    /// preserved, the streak state passes through untouched.
    pub fn resume(
        &self,
        streak: &StreakState,
        today: NaiveDate,
    ) -> Result<(PauseState, StreakState), StateError> {
        if !self.is_paused {
            return Err(StateError::NotPaused);
        }
        let duration = self
            .paused_at
            .map(|start| (today - start).num_days())
            .unwrap_or(0);

        let mut pause = self.clone();
        pause.is_paused = false;
        pause.resumed_at = Some(today);
        pause.pause_duration_days = Some(duration);

        let mut streak = streak.clone();
        if !self.streak_preserved {
            streak.current_streak = 0;
            streak.missed_days = 0;
            streak.grace_days_used = 0;
        }
        Ok((pause, streak))
    }

    /// Guard around streak updates.
    ///
    /// While paused nothing moves. On the exact day of resume a
    /// completion either extends the streak (preserved) or restarts it
    /// at 1 (not preserved). Every other case passes through
    /// unchanged -- the recovery rules own it from there.
    pub fn update_streak(
        &self,
        streak: &StreakState,
        date: NaiveDate,
        was_completed: bool,
    ) -> StreakState {
        if self.is_paused {
            return streak.clone();
        }
        if self.resumed_at == Some(date) && was_completed {
            let mut next = streak.clone();
            next.current_streak = if self.streak_preserved {
                next.current_streak + 1
            } else {
                1
            };
            next.longest_streak = next.longest_streak.max(next.current_streak);
            next.last_completion_date = Some(date);
            next.missed_days = 0;
            return next;
        }
        streak.clone()
    }

    /// Report what is currently legal under `policy`.
    pub fn status(&self, policy: &PausePolicy, today: NaiveDate) -> PauseStatus {
        let remaining = match (self.is_paused, self.paused_at, policy.max_pause_days) {
            (true, Some(start), Some(max)) => Some(i64::from(max) - (today - start).num_days()),
            _ => None,
        };
        PauseStatus {
            can_pause: !self.is_paused,
            can_resume: self.is_paused,
            remaining_pause_days: remaining,
        }
    }
}
