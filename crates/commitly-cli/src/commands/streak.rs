use chrono::Utc;
use clap::Subcommand;
use commitly_core::storage::{Config, Database};
use commitly_core::{CoreError, Event};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Streak status for a goal
    Status {
        /// Goal id
        id: String,
    },
    /// Freeze a streak for a number of days
    Freeze {
        /// Goal id
        id: String,
        /// Days to freeze
        days: u32,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let today = Utc::now().date_naive();

    match action {
        StreakAction::Status { id } => {
            let streak = db.load_streak(&id)?.unwrap_or_default();
            let (status, message) = streak.status(&config.recovery, today);
            let report = serde_json::json!({
                "status": status,
                "message": message,
                "state": streak,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StreakAction::Freeze { id, days } => {
            let streak = db.load_streak(&id)?.unwrap_or_default();
            let frozen = streak.freeze(&config.recovery, days, today)?;
            let until = frozen
                .freeze_end_date
                .ok_or_else(|| CoreError::Custom("freeze window out of range".into()))?;
            db.save_streak(&id, &frozen)?;
            let event = Event::StreakFrozen {
                goal_id: id,
                until,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
