//! Recurrence patterns and schedule-driven completion tracking.
//!
//! A [`GoalSchedule`] answers two questions: is the goal due on a
//! given calendar date, and what happens to its completion count and
//! streak when the user checks in. Every operation is a pure
//! transform -- the caller reads state, applies it, and writes the
//! result back.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// How far `next_scheduled_date` looks before giving up. A year covers
/// every monthly and low-frequency daily pattern.
const MAX_LOOKAHEAD_DAYS: u32 = 366;

/// Recurrence pattern kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Once,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

/// A recurrence pattern. Exactly one interpretation rule applies per
/// [`PatternType`]; the optional fields only matter for the type that
/// reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePattern {
    pub pattern: PatternType,
    /// Every Nth day from the start date (`daily` only).
    #[serde(default)]
    pub frequency: Option<u32>,
    /// Allowed weekdays, 0 = Sunday .. 6 = Saturday (`weekly` only).
    #[serde(default)]
    pub days_of_week: Option<Vec<u8>>,
    /// Allowed days of month, 1-31 (`monthly` only).
    #[serde(default)]
    pub days_of_month: Option<Vec<u8>>,
    /// Explicit date list (`once` only).
    #[serde(default)]
    pub dates: Option<Vec<NaiveDate>>,
}

impl SchedulePattern {
    pub fn once() -> Self {
        Self {
            pattern: PatternType::Once,
            frequency: None,
            days_of_week: None,
            days_of_month: None,
            dates: None,
        }
    }

    pub fn daily() -> Self {
        Self {
            pattern: PatternType::Daily,
            ..Self::once()
        }
    }

    pub fn every(frequency: u32) -> Self {
        Self {
            pattern: PatternType::Daily,
            frequency: Some(frequency),
            ..Self::once()
        }
    }

    pub fn weekly(days_of_week: Vec<u8>) -> Self {
        Self {
            pattern: PatternType::Weekly,
            days_of_week: Some(days_of_week),
            ..Self::once()
        }
    }

    pub fn monthly(days_of_month: Vec<u8>) -> Self {
        Self {
            pattern: PatternType::Monthly,
            days_of_month: Some(days_of_month),
            ..Self::once()
        }
    }

    /// Whether `date` matches this pattern relative to `start`.
    pub fn matches(&self, start: NaiveDate, date: NaiveDate) -> bool {
        match self.pattern {
            PatternType::Once => {
                date == start
                    || self
                        .dates
                        .as_deref()
                        .is_some_and(|dates| dates.contains(&date))
            }
            PatternType::Daily => match self.frequency {
                Some(n) if n > 1 => {
                    let offset = (date - start).num_days();
                    offset >= 0 && offset % i64::from(n) == 0
                }
                _ => true,
            },
            PatternType::Weekly => {
                let weekday = date.weekday().num_days_from_sunday() as u8;
                self.days_of_week
                    .as_deref()
                    .is_some_and(|days| days.contains(&weekday))
            }
            PatternType::Monthly => {
                let day = date.day() as u8;
                self.days_of_month
                    .as_deref()
                    .is_some_and(|days| days.contains(&day))
            }
            // TODO: matching semantics for custom patterns are still
            // undecided upstream; until then they never match.
            PatternType::Custom => false,
        }
    }
}

/// When a goal stops being active. Each variant carries its own
/// threshold, so exactly one is ever meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EndCondition {
    /// Active through `until`, inclusive.
    Date { until: NaiveDate },
    /// Done after this many completions.
    Completions { target: u32 },
    /// Done once the streak reaches this length.
    Streak { target: u32 },
    Never,
}

impl EndCondition {
    /// True once the goal can no longer be active as of `date`.
    fn reached(&self, date: NaiveDate, completions: u32, streak: u32) -> bool {
        match *self {
            EndCondition::Date { until } => date > until,
            EndCondition::Completions { target } => completions >= target,
            EndCondition::Streak { target } => streak >= target,
            EndCondition::Never => false,
        }
    }
}

/// Schedule state for one goal: the pattern plus the counters the
/// daily check-in advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSchedule {
    pub start_date: NaiveDate,
    pub pattern: SchedulePattern,
    pub end_condition: EndCondition,
    #[serde(default)]
    pub completions: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_completion_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl GoalSchedule {
    pub fn new(start_date: NaiveDate, pattern: SchedulePattern, end_condition: EndCondition) -> Self {
        Self {
            start_date,
            pattern,
            end_condition,
            completions: 0,
            streak: 0,
            last_completion_date: None,
            is_active: true,
        }
    }

    /// Whether the goal is due on `date`.
    ///
    /// The end-condition check precedes the pattern check: a goal past
    /// its end date or target is never active, whatever the pattern
    /// says.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if !self.is_active || date < self.start_date {
            return false;
        }
        if self
            .end_condition
            .reached(date, self.completions, self.streak)
        {
            return false;
        }
        self.pattern.matches(self.start_date, date)
    }

    /// First pattern-matching date strictly after `after`, or `None`
    /// when nothing matches within a year.
    pub fn next_scheduled_date(&self, after: NaiveDate) -> Option<NaiveDate> {
        let mut date = after.succ_opt()?;
        for _ in 0..MAX_LOOKAHEAD_DAYS {
            if self.pattern.matches(self.start_date, date) {
                return Some(date);
            }
            date = date.succ_opt()?;
        }
        None
    }

    /// True once a completions or streak target has been met.
    pub fn target_reached(&self) -> bool {
        match self.end_condition {
            EndCondition::Completions { target } => self.completions >= target,
            EndCondition::Streak { target } => self.streak >= target,
            _ => false,
        }
    }

    /// Fold one day's outcome into the schedule.
    ///
    /// On a day the goal is not due this is a no-op clone, so calling
    /// it repeatedly with the same inputs is safe. A completion bumps
    /// `completions` and continues the streak only when the previous
    /// completion sits on the immediately preceding scheduled day; a
    /// miss on such a day zeroes the streak.
    pub fn update_completion(&self, date: NaiveDate, was_completed: bool) -> GoalSchedule {
        if !self.is_active_on(date) {
            return self.clone();
        }

        let mut next = self.clone();
        let consecutive = match next.last_completion_date {
            Some(prev) => next.next_scheduled_date(prev) == Some(date),
            None => false,
        };

        if was_completed {
            next.completions += 1;
            next.streak = if consecutive { next.streak + 1 } else { 1 };
            next.last_completion_date = Some(date);
        } else if consecutive {
            next.streak = 0;
        }

        if next.target_reached() {
            next.is_active = false;
        }
        next
    }
}
