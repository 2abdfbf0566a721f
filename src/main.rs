use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fairway::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fairway::AppCommand {
    fn from(cmd: Commands) -> fairway::AppCommand {
        match cmd {
            Commands::Handicap { user_id } => fairway::AppCommand::Handicap { user_id },
            Commands::Leaderboard { period, limit } => {
                fairway::AppCommand::Leaderboard { period, limit }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display a player's handicap index and stats
    Handicap {
        /// Player to compute the handicap for
        user_id: String,
    },
    /// Display the ranked leaderboard for a period
    Leaderboard {
        /// Time window: week, month or year
        #[arg(short, long)]
        period: Option<String>,
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fairway::cli::setup::setup(),
        Some(cmd) => fairway::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
