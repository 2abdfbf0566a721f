use super::ui;
use crate::core::handicap::{self, RECENT_ROUNDS_WINDOW};
use crate::core::profile::PlayerStats;
use crate::core::round::RoundProvider;
use anyhow::Result;
use comfy_table::Cell;

/// A player's freshly computed handicap index and stats snapshot.
#[derive(Debug)]
pub struct HandicapReport {
    pub user_id: String,
    pub index: f64,
    pub stats: PlayerStats,
}

impl HandicapReport {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Stat"), ui::header_cell("Value")]);

        table.add_row(vec![
            Cell::new("Rounds recorded"),
            Cell::new(self.stats.total_rounds.to_string()),
        ]);
        table.add_row(vec![
            Cell::new("Best score"),
            ui::format_optional_cell(self.stats.best_score, |s| s.to_string()),
        ]);
        table.add_row(vec![
            Cell::new("Average score"),
            ui::format_optional_cell(self.stats.average_score, |s| format!("{s:.1}")),
        ]);
        table.add_row(vec![
            Cell::new("Last played"),
            ui::format_optional_cell(self.stats.last_played, |d| d.to_string()),
        ]);

        let mut output = format!(
            "Player: {}\n\n",
            ui::style_text(&self.user_id, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Handicap Index", ui::StyleType::Label),
            ui::style_text(&format!("{:.1}", self.index), ui::StyleType::Highlight)
        ));
        output
    }
}

/// Fetches a player's recent rounds and displays the recomputed handicap
/// index and statistics.
pub async fn run(rounds: &dyn RoundProvider, user_id: &str) -> Result<()> {
    let pb = ui::new_spinner("Fetching rounds...");
    let history = rounds
        .fetch_recent_rounds(user_id, RECENT_ROUNDS_WINDOW)
        .await;
    pb.finish_and_clear();
    let history = history?;

    let report = HandicapReport {
        user_id: user_id.to_string(),
        index: handicap::compute_handicap_index(&history),
        stats: handicap::compute_stats(&history),
    };
    println!("{}", report.display_as_table());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_report_renders_stats() {
        let report = HandicapReport {
            user_id: "u1".to_string(),
            index: 12.34,
            stats: PlayerStats {
                total_rounds: 7,
                best_score: Some(78),
                average_score: Some(83.4),
                last_played: NaiveDate::from_ymd_opt(2024, 6, 2),
            },
        };
        let output = report.display_as_table();
        assert!(output.contains("u1"));
        assert!(output.contains('7'));
        assert!(output.contains("78"));
        assert!(output.contains("83.4"));
        assert!(output.contains("2024-06-02"));
        assert!(output.contains("12.3"));
    }

    #[test]
    fn test_report_renders_missing_stats_as_na() {
        let report = HandicapReport {
            user_id: "u1".to_string(),
            index: 54.0,
            stats: PlayerStats::default(),
        };
        let output = report.display_as_table();
        assert!(output.contains("N/A"));
        assert!(output.contains("54.0"));
    }
}
