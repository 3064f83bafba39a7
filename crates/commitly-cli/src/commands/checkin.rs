use chrono::Utc;
use clap::Args;
use commitly_core::storage::{Config, Database};
use commitly_core::{CoreError, Event, GoalType, StateError};

use super::parse_date;

#[derive(Args)]
pub struct CheckinArgs {
    /// Goal id
    pub goal: String,
    /// Date of the check-in (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Record a missed day instead of a completion
    #[arg(long, conflicts_with = "activities")]
    pub missed: bool,
    /// Completed activity id (multi goals; repeatable)
    #[arg(long = "activity")]
    pub activities: Vec<String>,
}

pub fn run(args: CheckinArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();

    let mut goal = db
        .get_goal(&args.goal)?
        .ok_or_else(|| StateError::GoalNotFound(args.goal.clone()))?;
    goal.ensure_mutable()?;

    let day = match &args.date {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };

    let schedule = db
        .load_schedule(&goal.id)?
        .ok_or_else(|| CoreError::Custom(format!("goal '{}' has no schedule", goal.id)))?;
    let streak = db.load_streak(&goal.id)?.unwrap_or_default();
    let pause = db.load_pause(&goal.id)?.unwrap_or_default();

    // Multi goals derive the day's outcome from the checklist policy.
    let multi = if goal.goal_type == GoalType::Multi {
        db.load_multi(&goal.id)?
    } else {
        None
    };
    if let Some(multi) = &multi {
        for id in &args.activities {
            if !multi.has_activity(id) {
                return Err(StateError::UnknownActivity {
                    goal: goal.id.clone(),
                    activity: id.clone(),
                }
                .into());
            }
        }
    }
    let completed = if args.missed {
        false
    } else if let Some(multi) = &multi {
        multi.policy_met(&args.activities)
    } else {
        true
    };

    // Pause guard first; recovery rules otherwise.
    let next_streak = if pause.is_paused || pause.resumed_at == Some(day) {
        pause.update_streak(&streak, day, completed)
    } else {
        let oracle = schedule.clone();
        streak.apply(&config.recovery, day, completed, move |d| {
            oracle.is_active_on(d)
        })
    };
    let next_schedule = schedule.update_completion(day, completed);

    let now = Utc::now();
    if let Some(multi) = &multi {
        let next_multi = multi.record_day(day, &args.activities);
        for id in &args.activities {
            db.record_completion(&goal.id, Some(id), day, now)?;
        }
        db.save_multi(&goal.id, &next_multi)?;
    } else if completed && schedule.is_active_on(day) {
        db.record_completion(&goal.id, None, day, now)?;
    }

    let mut events = vec![Event::CheckinRecorded {
        goal_id: goal.id.clone(),
        date: day,
        completed,
        streak: next_streak.current_streak,
        completions: next_schedule.completions,
        at: now,
    }];
    if next_streak.current_streak > streak.current_streak {
        events.push(Event::StreakExtended {
            goal_id: goal.id.clone(),
            current_streak: next_streak.current_streak,
            longest_streak: next_streak.longest_streak,
            at: now,
        });
    } else if next_streak.current_streak == 0 && streak.current_streak > 0 {
        events.push(Event::StreakBroken {
            goal_id: goal.id.clone(),
            previous_streak: streak.current_streak,
            at: now,
        });
    }

    if next_schedule.target_reached() && !next_schedule.is_active {
        goal.completed_at = Some(now);
        goal.updated_at = now;
        db.update_goal(&goal)?;
        events.push(Event::GoalCompleted {
            goal_id: goal.id.clone(),
            completions: next_schedule.completions,
            at: now,
        });
    }

    db.save_schedule(&goal.id, &next_schedule)?;
    db.save_streak(&goal.id, &next_streak)?;

    for event in &events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}
