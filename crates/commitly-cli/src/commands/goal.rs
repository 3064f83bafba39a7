use chrono::Utc;
use clap::Subcommand;
use commitly_core::storage::Database;
use commitly_core::{
    EndCondition, Event, Goal, GoalSchedule, GoalType, MultiActivityGoal, PatternType,
    RequirementPolicy, SchedulePattern, StateError, ValidationError, Visibility,
};

use super::parse_date;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal
    Add {
        /// Goal title
        title: String,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Goal kind: single, multi, or recurring
        #[arg(long, default_value = "recurring")]
        goal_type: String,
        /// Visibility: private, partners, or public
        #[arg(long, default_value = "private")]
        visibility: String,
        /// Start date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        start: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Recurrence: once, daily, weekly, or monthly
        #[arg(long, default_value = "daily")]
        pattern: String,
        /// Repeat every N days (daily pattern)
        #[arg(long)]
        every: Option<u32>,
        /// Weekdays for weekly patterns, e.g. "mon,wed,fri"
        #[arg(long)]
        days: Option<String>,
        /// Days of month for monthly patterns, e.g. "1,15"
        #[arg(long)]
        month_days: Option<String>,
        /// Extra dates for once patterns (YYYY-MM-DD; repeatable)
        #[arg(long = "on")]
        on_dates: Vec<String>,
        /// Stop after this many completions
        #[arg(long, conflicts_with_all = ["target_streak", "until"])]
        target_completions: Option<u32>,
        /// Stop once the streak reaches this length
        #[arg(long, conflicts_with = "until")]
        target_streak: Option<u32>,
        /// Last day the goal can be active (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
        /// Requirement policy for multi goals: all, any, minimum, or percentage
        #[arg(long, default_value = "all")]
        policy: String,
        /// Activities needed per day (minimum policy)
        #[arg(long)]
        min_activities: Option<u32>,
        /// Percentage of activities needed per day (percentage policy)
        #[arg(long)]
        percent: Option<u8>,
    },
    /// List goals
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one goal with its schedule and streak state
    Show {
        /// Goal id
        id: String,
    },
    /// Suspend a goal (skipped by the due-date watcher)
    Suspend {
        /// Goal id
        id: String,
        /// Lift the suspension instead
        #[arg(long)]
        off: bool,
    },
    /// Remove a goal and its history
    Archive {
        /// Goal id
        id: String,
    },
}

fn invalid(field: &str, message: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_weekday(s: &str) -> Option<u8> {
    match s {
        "sun" | "sunday" | "0" => Some(0),
        "mon" | "monday" | "1" => Some(1),
        "tue" | "tuesday" | "2" => Some(2),
        "wed" | "wednesday" | "3" => Some(3),
        "thu" | "thursday" | "4" => Some(4),
        "fri" | "friday" | "5" => Some(5),
        "sat" | "saturday" | "6" => Some(6),
        _ => None,
    }
}

fn parse_day_list(s: &str) -> Result<Vec<u8>, ValidationError> {
    s.split(',')
        .map(str::trim)
        .map(|part| {
            parse_weekday(&part.to_lowercase())
                .ok_or_else(|| invalid("days", &format!("unknown weekday '{part}'")))
        })
        .collect()
}

fn parse_month_days(s: &str) -> Result<Vec<u8>, ValidationError> {
    s.split(',')
        .map(str::trim)
        .map(|part| match part.parse::<u8>() {
            Ok(day) if (1..=31).contains(&day) => Ok(day),
            _ => Err(invalid("month_days", &format!("invalid day of month '{part}'"))),
        })
        .collect()
}

fn build_pattern(
    pattern: &str,
    every: Option<u32>,
    days: Option<&str>,
    month_days: Option<&str>,
) -> Result<SchedulePattern, ValidationError> {
    match pattern {
        "once" => Ok(SchedulePattern::once()),
        "daily" => Ok(match every {
            Some(n) if n > 1 => SchedulePattern::every(n),
            _ => SchedulePattern::daily(),
        }),
        "weekly" => {
            let days = days.ok_or_else(|| invalid("days", "weekly patterns need --days"))?;
            Ok(SchedulePattern::weekly(parse_day_list(days)?))
        }
        "monthly" => {
            let days = month_days
                .ok_or_else(|| invalid("month_days", "monthly patterns need --month-days"))?;
            Ok(SchedulePattern::monthly(parse_month_days(days)?))
        }
        other => Err(invalid("pattern", &format!("unknown pattern '{other}'"))),
    }
}

fn build_policy(
    policy: &str,
    min_activities: Option<u32>,
    percent: Option<u8>,
) -> Result<RequirementPolicy, ValidationError> {
    match policy {
        "all" => Ok(RequirementPolicy::All),
        "any" => Ok(RequirementPolicy::Any),
        "minimum" => {
            let count = min_activities
                .ok_or_else(|| invalid("min_activities", "minimum policy needs --min-activities"))?;
            Ok(RequirementPolicy::Minimum { count })
        }
        "percentage" => {
            let required = percent
                .ok_or_else(|| invalid("percent", "percentage policy needs --percent"))?;
            if required > 100 {
                return Err(invalid("percent", "must be between 0 and 100"));
            }
            Ok(RequirementPolicy::Percentage { required })
        }
        other => Err(invalid("policy", &format!("unknown policy '{other}'"))),
    }
}

#[allow(clippy::too_many_arguments)]
fn add_goal(
    db: &Database,
    title: &str,
    description: Option<String>,
    goal_type: GoalType,
    visibility: Visibility,
    pattern: SchedulePattern,
    end_condition: EndCondition,
    start: Option<String>,
    due: Option<String>,
    policy: RequirementPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_date = match start {
        Some(s) => parse_date(&s)?,
        None => Utc::now().date_naive(),
    };
    let mut goal = Goal::new(title, goal_type, visibility, start_date);
    goal.description = description.unwrap_or_default();
    goal.due_date = due.map(|s| parse_date(&s)).transpose()?;

    db.insert_goal(&goal)?;
    db.save_schedule(&goal.id, &GoalSchedule::new(start_date, pattern, end_condition))?;
    if goal_type == GoalType::Multi {
        db.save_multi(&goal.id, &MultiActivityGoal::new(&goal.id, Vec::new(), policy))?;
    }

    let event = Event::GoalCreated {
        goal_id: goal.id.clone(),
        title: goal.title.clone(),
        goal_type,
        at: Utc::now(),
    };
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        GoalAction::Add {
            title,
            description,
            goal_type,
            visibility,
            start,
            due,
            pattern,
            every,
            days,
            month_days,
            on_dates,
            target_completions,
            target_streak,
            until,
            policy,
            min_activities,
            percent,
        } => {
            let goal_type = GoalType::parse(&goal_type)
                .ok_or_else(|| invalid("goal_type", &format!("unknown goal type '{goal_type}'")))?;
            let visibility = Visibility::parse(&visibility)
                .ok_or_else(|| invalid("visibility", &format!("unknown visibility '{visibility}'")))?;
            let mut pattern = build_pattern(&pattern, every, days.as_deref(), month_days.as_deref())?;
            if !on_dates.is_empty() {
                if pattern.pattern != PatternType::Once {
                    return Err(invalid("on", "--on only applies to once patterns").into());
                }
                pattern.dates = Some(
                    on_dates
                        .iter()
                        .map(|s| parse_date(s))
                        .collect::<Result<Vec<_>, _>>()?,
                );
            }
            let end_condition = match (until, target_completions, target_streak) {
                (Some(s), _, _) => EndCondition::Date {
                    until: parse_date(&s)?,
                },
                (None, Some(target), _) => EndCondition::Completions { target },
                (None, None, Some(target)) => EndCondition::Streak { target },
                (None, None, None) => EndCondition::Never,
            };
            let policy = build_policy(&policy, min_activities, percent)?;
            add_goal(
                &db,
                &title,
                description,
                goal_type,
                visibility,
                pattern,
                end_condition,
                start,
                due,
                policy,
            )?;
        }
        GoalAction::List { json } => {
            let goals = db.list_goals()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&goals)?);
            } else {
                for goal in goals {
                    let state = if goal.is_terminal() {
                        "done"
                    } else if goal.suspended {
                        "suspended"
                    } else {
                        "open"
                    };
                    println!("{}  {}  [{} / {state}]", goal.id, goal.title, goal.goal_type.as_str());
                }
            }
        }
        GoalAction::Show { id } => {
            let goal = db
                .get_goal(&id)?
                .ok_or_else(|| StateError::GoalNotFound(id.clone()))?;
            let detail = serde_json::json!({
                "goal": goal,
                "schedule": db.load_schedule(&id)?,
                "streak": db.load_streak(&id)?,
                "pause": db.load_pause(&id)?,
                "activities": db.load_multi(&id)?,
            });
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        GoalAction::Suspend { id, off } => {
            let mut goal = db
                .get_goal(&id)?
                .ok_or_else(|| StateError::GoalNotFound(id.clone()))?;
            goal.suspended = !off;
            goal.updated_at = Utc::now();
            db.update_goal(&goal)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Archive { id } => {
            if !db.archive_goal(&id)? {
                return Err(StateError::GoalNotFound(id).into());
            }
            let event = Event::GoalArchived {
                goal_id: id,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
