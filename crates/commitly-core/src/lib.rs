//! # Commitly Core Library
//!
//! This library provides the core business logic for Commitly, a
//! goal-tracking application with streaks, accountability pauses, and
//! multi-activity checklists. It implements a CLI-first philosophy
//! where all operations are available via a standalone CLI binary; any
//! GUI would be a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Calculators**: schedule matching, streak recovery, pause
//!   handling, and multi-activity aggregation are pure functions --
//!   the caller reads state, applies the transform, and persists the
//!   result. No calculator reads the clock or the store.
//! - **Storage**: SQLite-backed goal records plus JSON state blobs,
//!   and TOML-based configuration
//! - **Events**: every state change produces an [`Event`] for callers
//!   to print or deliver
//!
//! ## Key Components
//!
//! - [`GoalSchedule`]: recurrence patterns and due-day calculation
//! - [`StreakState`]: streak continuation under a recovery mode
//! - [`PauseState`]: pause/resume lifecycle
//! - [`MultiActivityGoal`]: checklist aggregation policies
//! - [`Database`]: goal and state persistence
//! - [`DueDateChecker`]: due-soon polling task

pub mod due;
pub mod error;
pub mod events;
pub mod goal;
pub mod schedule;
pub mod storage;
pub mod streak;

pub use due::DueDateChecker;
pub use error::{ConfigError, CoreError, DatabaseError, Result, StateError, ValidationError};
pub use events::Event;
pub use goal::{Goal, GoalType, Visibility};
pub use schedule::{EndCondition, GoalSchedule, PatternType, SchedulePattern};
pub use storage::{Config, Database, Stats};
pub use streak::{
    overall_streak, Activity, ActivityStreak, MultiActivityGoal, PausePolicy, PauseState,
    PauseStatus, RecoveryConfig, RecoveryMode, RequirementPolicy, StreakState, StreakStatus,
};
