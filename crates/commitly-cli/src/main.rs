use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "commitly-cli", version, about = "Commitly CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Record a day's outcome for a goal
    Checkin(commands::checkin::CheckinArgs),
    /// Streak status and freezing
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Pause and resume goals
    Pause {
        #[command(subcommand)]
        action: commands::pause::PauseAction,
    },
    /// Activities of multi-activity goals
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Completion statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Watch for goals due soon
    Watch(commands::watch::WatchArgs),
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Checkin(args) => commands::checkin::run(args),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Pause { action } => commands::pause::run(action),
        Commands::Activity { action } => commands::activity::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "commitly-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
