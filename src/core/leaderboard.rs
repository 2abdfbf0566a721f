//! Leaderboard aggregation across users for a time window.
//!
//! Aggregation is a pure fold over already-fetched rounds, apart from the
//! per-user profile lookups, which are independent reads and issued
//! concurrently. A failed lookup fails the whole aggregation; a missing
//! profile only drops that user.

use crate::core::profile::ProfileProvider;
use crate::core::round::Round;
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use futures::future::join_all;
use std::collections::HashMap;
use std::fmt::Display;
use tracing::debug;

/// Time window scoping leaderboard eligibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
}

impl Period {
    /// Parses a period selector. Unrecognized values fall back to the
    /// monthly window rather than erroring.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "week" => Period::Week,
            "year" => Period::Year,
            "month" => Period::Month,
            other => {
                debug!(period = other, "Unknown period, falling back to month");
                Period::Month
            }
        }
    }

    /// First calendar date included in the window ending at `today`.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Period::Week => today - Duration::days(7),
            Period::Month => today.with_day(1).unwrap_or(today),
            Period::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Period::Week => "week",
                Period::Month => "month",
                Period::Year => "year",
            }
        )
    }
}

/// One ranked row of the leaderboard: a user's best round in the window
/// merged with their profile.
#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub score: u32,
    pub course_name: Option<String>,
    pub round_date: NaiveDate,
    pub name: String,
    pub username: String,
    pub handicap: f64,
    pub position: usize,
}

/// Reduces a flat set of rounds to each user's single best round.
///
/// Scoreless rounds never become candidates. On an exact score tie the
/// round seen first is kept, and users appear in first-seen order, so the
/// later stable sort ranks tied users by when their round first showed up.
pub fn best_rounds(rounds: &[Round]) -> Vec<&Round> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut best: Vec<&Round> = Vec::new();

    for round in rounds {
        let Some(score) = round.score else {
            continue;
        };
        match slots.get(round.user_id.as_str()) {
            Some(&slot) => {
                if best[slot].score.is_some_and(|kept| score < kept) {
                    best[slot] = round;
                }
            }
            None => {
                slots.insert(&round.user_id, best.len());
                best.push(round);
            }
        }
    }
    best
}

/// Builds the ranked leaderboard for an already-filtered set of rounds.
///
/// Positions are dense and 1-based: ties get consecutive distinct
/// positions, and truncation to `limit` happens after positioning, so a
/// cut list never renumbers.
pub async fn aggregate(
    rounds: &[Round],
    profiles: &dyn ProfileProvider,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>> {
    let best = best_rounds(rounds);
    debug!(
        rounds = rounds.len(),
        candidates = best.len(),
        "Aggregating leaderboard"
    );

    let profile_futures = best
        .iter()
        .map(|round| profiles.fetch_profile(&round.user_id));
    let results = join_all(profile_futures).await;

    let mut entries = Vec::with_capacity(best.len());
    for (round, result) in best.iter().zip(results) {
        let Some(profile) = result? else {
            debug!(user_id = %round.user_id, "No profile for user, dropping from leaderboard");
            continue;
        };
        // best_rounds only keeps scored rounds
        let Some(score) = round.score else {
            continue;
        };
        entries.push(LeaderboardEntry {
            user_id: round.user_id.clone(),
            score,
            course_name: round.course_name.clone(),
            round_date: round.round_date,
            name: profile.name,
            username: profile.username,
            handicap: profile.handicap,
            position: 0,
        });
    }

    // Stable sort: equal scores keep their first-seen order
    entries.sort_by_key(|entry| entry.score);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.position = index + 1;
    }
    entries.truncate(limit);
    Ok(entries)
}
