use clap::Subcommand;
use commitly_core::storage::Database;
use commitly_core::{Activity, GoalType, StateError, ValidationError};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Add an activity to a multi-activity goal
    Add {
        /// Goal id
        goal: String,
        /// Activity name
        name: String,
        /// Mark the activity as required
        #[arg(long)]
        required: bool,
    },
    /// List a goal's activities and their streaks
    List {
        /// Goal id
        goal: String,
    },
}

pub fn run(action: ActivityAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ActivityAction::Add {
            goal,
            name,
            required,
        } => {
            let record = db
                .get_goal(&goal)?
                .ok_or_else(|| StateError::GoalNotFound(goal.clone()))?;
            if record.goal_type != GoalType::Multi {
                return Err(ValidationError::InvalidValue {
                    field: "goal".into(),
                    message: format!("goal '{goal}' is not a multi-activity goal"),
                }
                .into());
            }
            let mut multi = db
                .load_multi(&goal)?
                .ok_or_else(|| StateError::GoalNotFound(goal.clone()))?;
            let activity = Activity {
                id: Uuid::new_v4().to_string(),
                name,
                required,
            };
            multi.add_activity(activity.clone());
            db.save_multi(&goal, &multi)?;
            println!("{}", serde_json::to_string_pretty(&activity)?);
        }
        ActivityAction::List { goal } => {
            let multi = db
                .load_multi(&goal)?
                .ok_or_else(|| StateError::GoalNotFound(goal.clone()))?;
            let listing = serde_json::json!({
                "activities": multi.activities,
                "streaks": multi.activity_streaks,
                "policy": multi.policy,
                "current_streak": multi.current_streak,
                "longest_streak": multi.longest_streak,
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(())
}
