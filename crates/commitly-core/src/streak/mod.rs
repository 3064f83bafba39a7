//! Streak state machines: recovery rules, pause handling, and
//! multi-activity aggregation.

mod multi_activity;
mod pause;
mod recovery;

pub use multi_activity::{
    overall_streak, Activity, ActivityStreak, MultiActivityGoal, RequirementPolicy,
};
pub use pause::{PausePolicy, PauseState, PauseStatus};
pub use recovery::{RecoveryConfig, RecoveryMode, StreakState, StreakStatus};
