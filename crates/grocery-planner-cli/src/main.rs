use clap::{Parser, Subcommand};
use grocery_planner_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "grocery-planner", version, about = "Grocery Planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shopping preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Grocery list management
    List {
        #[command(subcommand)]
        action: commands::list::ListAction,
    },
    /// Weekly schedule generation and approval
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Fixture calendar events
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// List the store directory
    Stores,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays parseable JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "dispatching command");
    let result = match cli.command {
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::List { action } => commands::list::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Stores => commands::stores::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
