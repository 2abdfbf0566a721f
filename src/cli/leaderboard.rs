use super::ui;
use crate::core::leaderboard::{self, LeaderboardEntry, Period};
use crate::core::profile::ProfileProvider;
use crate::core::round::RoundProvider;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use tracing::debug;

pub fn display_as_table(entries: &[LeaderboardEntry], period: Period) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pos"),
        ui::header_cell("Player"),
        ui::header_cell("Score"),
        ui::header_cell("Course"),
        ui::header_cell("Date"),
        ui::header_cell("Hcp"),
    ]);

    for entry in entries {
        let player = if entry.name.is_empty() {
            entry.username.clone()
        } else {
            entry.name.clone()
        };
        table.add_row(vec![
            Cell::new(entry.position.to_string()),
            Cell::new(player),
            Cell::new(entry.score.to_string()),
            Cell::new(entry.course_name.as_deref().unwrap_or("N/A")),
            Cell::new(entry.round_date.to_string()),
            Cell::new(format!("{:.1}", entry.handicap)),
        ]);
    }

    let mut output = format!(
        "Leaderboard: {}\n\n",
        ui::style_text(&format!("this {period}"), ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output
}

/// Fetches the period's rounds, aggregates each player's best score and
/// displays the ranked leaderboard.
pub async fn run(
    rounds: &dyn RoundProvider,
    profiles: &dyn ProfileProvider,
    period: Period,
    limit: usize,
    today: NaiveDate,
) -> Result<()> {
    let start = period.start_date(today);
    debug!(%period, %start, limit, "Generating leaderboard");

    let pb = ui::new_spinner("Fetching rounds...");
    let pool = rounds.fetch_rounds_since(start).await;
    pb.finish_and_clear();

    let entries = leaderboard::aggregate(&pool?, profiles, limit).await?;
    if entries.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("No rounds recorded this {period}."),
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }
    println!("{}", display_as_table(&entries, period));
    Ok(())
}
