use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod outbox;
mod session;

#[derive(Parser)]
#[command(name = "habitly", version, about = "Habitly habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identity management
    Identity {
        #[command(subcommand)]
        action: commands::identity::IdentityAction,
    },
    /// Habit management and daily logging
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Streaks, rates and history
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Reminder planning and delivery
    Reminders {
        #[command(subcommand)]
        action: commands::reminders::RemindersAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Plan status and upgrade
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// Export the whole collection as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
    /// List built-in identity templates
    Catalog,
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("HABITLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Identity { action } => commands::identity::run(action).await,
        Commands::Habit { action } => commands::habit::run(action).await,
        Commands::Stats { action } => commands::stats::run(action).await,
        Commands::Reminders { action } => commands::reminders::run(action).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Account { action } => commands::account::run(action),
        Commands::Export { output } => commands::export::run(output).await,
        Commands::Catalog => commands::catalog::run(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "habitly", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
