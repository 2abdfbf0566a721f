pub mod cli;
pub mod core;
pub mod events;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::leaderboard::Period;
use crate::providers::RestBackend;
use anyhow::Result;
use tracing::{debug, info};

/// Commands the binary dispatches after argument parsing.
pub enum AppCommand {
    Handicap { user_id: String },
    Leaderboard { period: Option<String>, limit: Option<usize> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Fairway starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let backend = RestBackend::new(&config.backend.base_url);

    match command {
        AppCommand::Handicap { user_id } => cli::handicap::run(&backend, &user_id).await,
        AppCommand::Leaderboard { period, limit } => {
            let period = Period::parse(period.as_deref().unwrap_or(&config.leaderboard.period));
            let limit = limit.unwrap_or(config.leaderboard.limit);
            let today = chrono::Utc::now().date_naive();
            cli::leaderboard::run(&backend, &backend, period, limit, today).await
        }
    }
}
