use chrono::Utc;
use clap::Subcommand;
use commitly_core::storage::{Config, Database};
use commitly_core::{Event, StateError};

#[derive(Subcommand)]
pub enum PauseAction {
    /// Pause a goal
    Start {
        /// Goal id
        id: String,
        /// Why the goal is being paused
        #[arg(long)]
        reason: Option<String>,
        /// Drop the streak instead of preserving it across the pause
        #[arg(long)]
        drop_streak: bool,
    },
    /// Resume a paused goal
    Stop {
        /// Goal id
        id: String,
    },
    /// Report whether pause/resume is currently legal
    Status {
        /// Goal id
        id: String,
    },
}

pub fn run(action: PauseAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let today = Utc::now().date_naive();

    match action {
        PauseAction::Start {
            id,
            reason,
            drop_streak,
        } => {
            let goal = db
                .get_goal(&id)?
                .ok_or_else(|| StateError::GoalNotFound(id.clone()))?;
            goal.ensure_mutable()?;
            let pause = db.load_pause(&id)?.unwrap_or_default();
            let paused = pause.pause(today, reason, !drop_streak)?;
            db.save_pause(&id, &paused)?;
            let event = Event::GoalPaused {
                goal_id: id,
                reason: paused.reason.clone(),
                streak_preserved: paused.streak_preserved,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        PauseAction::Stop { id } => {
            let pause = db.load_pause(&id)?.unwrap_or_default();
            let streak = db.load_streak(&id)?.unwrap_or_default();
            let (resumed, settled) = pause.resume(&streak, today)?;
            db.save_pause(&id, &resumed)?;
            db.save_streak(&id, &settled)?;
            let event = Event::GoalResumed {
                goal_id: id,
                pause_duration_days: resumed.pause_duration_days.unwrap_or(0),
                streak_preserved: resumed.streak_preserved,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        PauseAction::Status { id } => {
            let pause = db.load_pause(&id)?.unwrap_or_default();
            let status = pause.status(&config.pause, today);
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}
