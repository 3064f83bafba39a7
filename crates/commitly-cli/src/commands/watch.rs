use clap::Args;
use commitly_core::storage::{Config, Database};
use commitly_core::DueDateChecker;

#[derive(Args)]
pub struct WatchArgs {
    /// Polling interval in minutes; defaults to the configured cadence
    #[arg(long)]
    pub interval_min: Option<u32>,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    if !config.notifications.enabled {
        println!("notifications are disabled; nothing to watch");
        return Ok(());
    }

    let minutes = args
        .interval_min
        .unwrap_or(config.notifications.check_interval_min)
        .max(1);
    let checker = DueDateChecker::new(config.notifications.due_soon_lead_days);
    let db = Database::open()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(checker.run(
        &db,
        std::time::Duration::from_secs(u64::from(minutes) * 60),
        |event| {
            if let Ok(json) = serde_json::to_string_pretty(event) {
                println!("{json}");
            }
        },
    ))?;
    Ok(())
}
