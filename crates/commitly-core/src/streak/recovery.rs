//! Streak continuation and recovery rules.
//!
//! Three recovery modes decide what a missed day does to a streak:
//! `strict` (any miss breaks it), `flexible` (a bounded number of
//! misses is tolerated), and `grace_period` (misses consume a grace
//! budget). Freezing suspends all mutation until the freeze window
//! passes.
//!
//! Whether a given day counted as "scheduled" is not decided here:
//! callers pass the oracle in, usually the goal's pattern matcher.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Fallback when `flexible` mode has no `max_missed_days` configured.
const DEFAULT_MAX_MISSED_DAYS: u32 = 3;
/// Fallback when `grace_period` mode has no `grace_days` configured.
const DEFAULT_GRACE_DAYS: u32 = 1;

/// How a streak reacts to missed days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryMode {
    #[default]
    Strict,
    Flexible,
    GracePeriod,
}

/// Recovery behavior knobs. Missing numeric fields fall back to
/// conservative defaults instead of erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    #[serde(default)]
    pub mode: RecoveryMode,
    /// Tolerated misses in `flexible` mode.
    #[serde(default)]
    pub max_missed_days: Option<u32>,
    /// Total grace budget in `grace_period` mode.
    #[serde(default)]
    pub grace_days: Option<u32>,
    #[serde(default)]
    pub allow_streak_freeze: bool,
}

impl RecoveryConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn flexible(max_missed_days: u32) -> Self {
        Self {
            mode: RecoveryMode::Flexible,
            max_missed_days: Some(max_missed_days),
            ..Self::default()
        }
    }

    pub fn grace_period(grace_days: u32) -> Self {
        Self {
            mode: RecoveryMode::GracePeriod,
            grace_days: Some(grace_days),
            ..Self::default()
        }
    }

    fn max_missed(&self) -> u32 {
        self.max_missed_days.unwrap_or(DEFAULT_MAX_MISSED_DAYS)
    }

    fn grace_budget(&self) -> u32 {
        self.grace_days.unwrap_or(DEFAULT_GRACE_DAYS)
    }
}

/// Streak counters for one goal. Invariant:
/// `longest_streak >= current_streak` after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completion_date: Option<NaiveDate>,
    /// Consecutive misses since the last completion.
    pub missed_days: u32,
    pub grace_days_used: u32,
    pub streak_frozen: bool,
    pub freeze_end_date: Option<NaiveDate>,
}

/// Classification reported by [`StreakState::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    Frozen,
    Broken,
    AtRisk,
    Active,
}

impl StreakState {
    /// Count scheduled days strictly between the last completion and
    /// `date`. Zero when there is no prior completion.
    pub fn days_missed_until(
        &self,
        date: NaiveDate,
        scheduled_day: impl Fn(NaiveDate) -> bool,
    ) -> u32 {
        let Some(last) = self.last_completion_date else {
            return 0;
        };
        let mut missed = 0;
        let mut day = last;
        loop {
            day = match day.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
            if day >= date {
                break;
            }
            if scheduled_day(day) {
                missed += 1;
            }
        }
        missed
    }

    fn frozen_on(&self, date: NaiveDate) -> bool {
        self.streak_frozen && self.freeze_end_date.is_some_and(|end| date <= end)
    }

    /// Fold one day's outcome into the streak under `config`.
    ///
    /// A frozen streak is inert until the freeze window passes, then
    /// unfreezes before the day is applied. `scheduled_day` tells the
    /// walk which intervening days actually counted.
    pub fn apply(
        &self,
        config: &RecoveryConfig,
        date: NaiveDate,
        was_completed: bool,
        scheduled_day: impl Fn(NaiveDate) -> bool,
    ) -> StreakState {
        let mut next = self.clone();

        if next.streak_frozen {
            if next.frozen_on(date) {
                return next;
            }
            next.streak_frozen = false;
            next.freeze_end_date = None;
        }

        if was_completed {
            let missed = next.days_missed_until(date, &scheduled_day);
            let continues = match config.mode {
                RecoveryMode::Strict => missed == 0,
                RecoveryMode::Flexible => missed <= config.max_missed(),
                RecoveryMode::GracePeriod => {
                    missed <= config.grace_budget().saturating_sub(next.grace_days_used)
                }
            };
            if continues {
                next.current_streak += 1;
                if config.mode == RecoveryMode::GracePeriod {
                    next.grace_days_used += missed;
                }
            } else {
                next.current_streak = 1;
                if config.mode == RecoveryMode::GracePeriod {
                    next.grace_days_used = 0;
                }
            }
            next.missed_days = 0;
            next.last_completion_date = Some(date);
        } else {
            next.missed_days += 1;
            let broken = match config.mode {
                RecoveryMode::Strict => true,
                RecoveryMode::Flexible => next.missed_days > config.max_missed(),
                RecoveryMode::GracePeriod => {
                    next.missed_days > config.grace_budget().saturating_sub(next.grace_days_used)
                }
            };
            if broken {
                next.current_streak = 0;
            }
        }

        next.longest_streak = next.longest_streak.max(next.current_streak);
        next
    }

    /// Freeze the streak for `days` days starting today.
    ///
    /// Errors unless freezing is enabled in the config.
    pub fn freeze(
        &self,
        config: &RecoveryConfig,
        days: u32,
        today: NaiveDate,
    ) -> Result<StreakState, StateError> {
        if !config.allow_streak_freeze {
            return Err(StateError::FreezeDisabled);
        }
        let mut next = self.clone();
        next.streak_frozen = true;
        next.freeze_end_date = today.checked_add_days(Days::new(u64::from(days)));
        Ok(next)
    }

    /// Classify the streak and say what the user can do about it.
    /// Pure: reads state and config only.
    pub fn status(&self, config: &RecoveryConfig, today: NaiveDate) -> (StreakStatus, String) {
        if self.frozen_on(today) {
            let until = self
                .freeze_end_date
                .map(|d| d.to_string())
                .unwrap_or_default();
            return (
                StreakStatus::Frozen,
                format!("Streak frozen until {until}. Missed days are not counted."),
            );
        }
        if self.current_streak == 0 {
            let message = match config.mode {
                RecoveryMode::Strict => "Streak broken. Complete today to start over at 1.",
                RecoveryMode::Flexible => "Streak broken. Complete today to start a new run.",
                RecoveryMode::GracePeriod => {
                    "Streak broken and grace budget spent. Complete today to start over."
                }
            };
            return (StreakStatus::Broken, message.to_string());
        }
        if self.missed_days > 0 {
            let message = match config.mode {
                RecoveryMode::Strict => {
                    "A scheduled day was missed; the next completion restarts at 1.".to_string()
                }
                RecoveryMode::Flexible => {
                    let left = config.max_missed().saturating_sub(self.missed_days);
                    format!("{} missed so far; {left} more can be absorbed.", self.missed_days)
                }
                RecoveryMode::GracePeriod => {
                    let left = config.grace_budget().saturating_sub(self.grace_days_used);
                    format!("Grace days remaining: {left}. Complete soon to keep the streak.")
                }
            };
            return (StreakStatus::AtRisk, message);
        }
        (
            StreakStatus::Active,
            format!("{}-day streak going strong.", self.current_streak),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn every_day(_: NaiveDate) -> bool {
        true
    }

    fn streak_of(n: u32, last: NaiveDate) -> StreakState {
        StreakState {
            current_streak: n,
            longest_streak: n,
            last_completion_date: Some(last),
            ..StreakState::default()
        }
    }

    #[test]
    fn strict_mode_resets_after_any_miss() {
        let state = streak_of(10, date(2025, 6, 1));
        // One day missed (6/2), completion on 6/3.
        let next = state.apply(&RecoveryConfig::strict(), date(2025, 6, 3), true, every_day);
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 10);
    }

    #[test]
    fn strict_mode_increments_with_no_miss() {
        let state = streak_of(10, date(2025, 6, 1));
        let next = state.apply(&RecoveryConfig::strict(), date(2025, 6, 2), true, every_day);
        assert_eq!(next.current_streak, 11);
        assert_eq!(next.longest_streak, 11);
    }

    #[test]
    fn flexible_mode_absorbs_misses_up_to_limit() {
        let config = RecoveryConfig::flexible(2);
        let state = streak_of(5, date(2025, 6, 1));
        // Two misses (6/2, 6/3), completion 6/4: continues.
        let next = state.apply(&config, date(2025, 6, 4), true, every_day);
        assert_eq!(next.current_streak, 6);
        // Three misses: resets.
        let next = state.apply(&config, date(2025, 6, 5), true, every_day);
        assert_eq!(next.current_streak, 1);
    }

    #[test]
    fn flexible_mode_defaults_to_three_missed_days() {
        let config = RecoveryConfig {
            mode: RecoveryMode::Flexible,
            ..RecoveryConfig::default()
        };
        let state = streak_of(5, date(2025, 6, 1));
        // Three misses tolerated by the fallback limit.
        let next = state.apply(&config, date(2025, 6, 5), true, every_day);
        assert_eq!(next.current_streak, 6);
        let next = state.apply(&config, date(2025, 6, 6), true, every_day);
        assert_eq!(next.current_streak, 1);
    }

    #[test]
    fn grace_period_consumes_budget_then_resets() {
        let config = RecoveryConfig::grace_period(2);
        let state = streak_of(7, date(2025, 6, 1));

        // Missing exactly 2 days fits the budget and consumes it.
        let next = state.apply(&config, date(2025, 6, 4), true, every_day);
        assert_eq!(next.current_streak, 8);
        assert_eq!(next.grace_days_used, 2);

        // Missing 3 days overruns: streak restarts, budget resets.
        let next = state.apply(&config, date(2025, 6, 5), true, every_day);
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.grace_days_used, 0);
    }

    #[test]
    fn grace_budget_does_not_replenish_between_completions() {
        let config = RecoveryConfig::grace_period(2);
        let mut state = streak_of(3, date(2025, 6, 1));
        // Miss 6/2, complete 6/3: one grace day used.
        state = state.apply(&config, date(2025, 6, 3), true, every_day);
        assert_eq!(state.grace_days_used, 1);
        // Miss 6/4 and 6/5, complete 6/6: needs 2 but only 1 remains.
        state = state.apply(&config, date(2025, 6, 6), true, every_day);
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.grace_days_used, 0);
    }

    #[test]
    fn misses_only_count_scheduled_days() {
        let config = RecoveryConfig::strict();
        let state = streak_of(4, date(2025, 6, 2));
        // Only Mondays are scheduled; the gap to next Monday has no
        // scheduled misses, so strict mode still continues.
        let mondays = |d: NaiveDate| {
            use chrono::Datelike;
            d.weekday().num_days_from_sunday() == 1
        };
        let next = state.apply(&config, date(2025, 6, 9), true, mondays);
        assert_eq!(next.current_streak, 5);
    }

    #[test]
    fn missed_day_breaks_streak_per_mode() {
        let strict = streak_of(6, date(2025, 6, 1))
            .apply(&RecoveryConfig::strict(), date(2025, 6, 2), false, every_day);
        assert_eq!(strict.current_streak, 0);
        assert_eq!(strict.missed_days, 1);

        let config = RecoveryConfig::flexible(2);
        let mut flexible = streak_of(6, date(2025, 6, 1));
        flexible = flexible.apply(&config, date(2025, 6, 2), false, every_day);
        flexible = flexible.apply(&config, date(2025, 6, 3), false, every_day);
        assert_eq!(flexible.current_streak, 6);
        flexible = flexible.apply(&config, date(2025, 6, 4), false, every_day);
        assert_eq!(flexible.current_streak, 0);
        assert_eq!(flexible.missed_days, 3);
    }

    #[test]
    fn frozen_streak_is_inert_until_window_passes() {
        let config = RecoveryConfig {
            allow_streak_freeze: true,
            ..RecoveryConfig::strict()
        };
        let state = streak_of(9, date(2025, 6, 1))
            .freeze(&config, 3, date(2025, 6, 2))
            .unwrap();
        assert_eq!(state.freeze_end_date, Some(date(2025, 6, 5)));

        // Inside the window nothing moves, not even missed days.
        let inside = state.apply(&config, date(2025, 6, 4), false, every_day);
        assert_eq!(inside, state);

        // Past the window the streak unfreezes, then the day applies.
        let after = state.apply(&config, date(2025, 6, 6), true, every_day);
        assert!(!after.streak_frozen);
        assert_eq!(after.freeze_end_date, None);
        assert_eq!(after.current_streak, 1);
    }

    #[test]
    fn freeze_requires_opt_in() {
        let state = StreakState::default();
        assert_eq!(
            state.freeze(&RecoveryConfig::strict(), 2, date(2025, 6, 1)),
            Err(StateError::FreezeDisabled)
        );
    }

    #[test]
    fn status_classification() {
        let config = RecoveryConfig {
            allow_streak_freeze: true,
            ..RecoveryConfig::grace_period(2)
        };
        let today = date(2025, 6, 10);

        let frozen = streak_of(4, date(2025, 6, 8))
            .freeze(&config, 5, today)
            .unwrap();
        assert_eq!(frozen.status(&config, today).0, StreakStatus::Frozen);

        let broken = StreakState::default();
        assert_eq!(broken.status(&config, today).0, StreakStatus::Broken);

        let at_risk = StreakState {
            missed_days: 1,
            ..streak_of(4, date(2025, 6, 8))
        };
        assert_eq!(at_risk.status(&config, today).0, StreakStatus::AtRisk);

        let active = streak_of(4, date(2025, 6, 9));
        let (status, message) = active.status(&config, today);
        assert_eq!(status, StreakStatus::Active);
        assert!(message.contains("4-day"));
    }

    #[test]
    fn longest_streak_never_drops_below_current() {
        let config = RecoveryConfig::strict();
        let mut state = StreakState::default();
        for day in 1..=9 {
            state = state.apply(&config, date(2025, 6, day), true, every_day);
            assert!(state.longest_streak >= state.current_streak);
        }
        assert_eq!(state.longest_streak, 9);
        state = state.apply(&config, date(2025, 6, 11), true, every_day);
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.longest_streak, 9);
    }
}
