//! Handicap index and player statistics calculations.
//!
//! Both functions are pure: they operate on an already-fetched slice of
//! rounds and never touch the store. Persisting the results back onto the
//! player's profile is the caller's job (see `events::handle_round_recorded`).

use crate::core::profile::PlayerStats;
use crate::core::round::Round;
use tracing::debug;

/// How many recent rounds the recompute handler fetches before invoking
/// the calculations below.
pub const RECENT_ROUNDS_WINDOW: usize = 20;

/// Default index for players without enough history, and the upper clamp.
pub const MAX_HANDICAP: f64 = 54.0;

/// World-handicap adjustment applied to the averaged differentials.
const ADJUSTMENT_FACTOR: f64 = 0.96;

/// Computes a player's handicap index from their recent rounds.
///
/// Rounds missing a score or either course rating contribute no
/// differential but still count toward the sample size that selects how
/// many of the lowest differentials are averaged. Fewer than 5 rounds, or
/// no usable differentials at all, yield the maximum index of 54.0.
/// The result is always within `[0, 54]` and is not rounded.
pub fn compute_handicap_index(rounds: &[Round]) -> f64 {
    if rounds.len() < 5 {
        debug!(
            rounds = rounds.len(),
            "Not enough rounds for a handicap index, using maximum"
        );
        return MAX_HANDICAP;
    }

    let mut differentials: Vec<f64> = rounds.iter().filter_map(Round::differential).collect();
    if differentials.is_empty() {
        debug!("No rounds with complete ratings, using maximum handicap");
        return MAX_HANDICAP;
    }
    differentials.sort_by(f64::total_cmp);

    // The averaging count is keyed off the full sample, not just the
    // rounds that produced a differential.
    let count = differentials_to_average(rounds.len()).min(differentials.len());
    let average: f64 = differentials[..count].iter().sum::<f64>() / count as f64;

    let index = (average * ADJUSTMENT_FACTOR).clamp(0.0, MAX_HANDICAP);
    debug!(
        rounds = rounds.len(),
        differentials = differentials.len(),
        averaged = count,
        index,
        "Computed handicap index"
    );
    index
}

/// Number of lowest differentials to average for a given sample size.
fn differentials_to_average(total_rounds: usize) -> usize {
    match total_rounds {
        n if n >= 20 => 8,
        n if n >= 15 => 6,
        n if n >= 10 => 4,
        n if n >= 8 => 3,
        n if n >= 6 => 2,
        _ => 1,
    }
}

/// Builds the stats snapshot for a player's round history.
///
/// `rounds` is expected most recent first (the order the backend returns);
/// `last_played` trusts that order. Rounds without a score are ignored by
/// the best/average figures, and the average is rounded half-up to one
/// decimal place.
pub fn compute_stats(rounds: &[Round]) -> PlayerStats {
    if rounds.is_empty() {
        return PlayerStats::default();
    }

    let scores: Vec<u32> = rounds.iter().filter_map(|r| r.score).collect();
    let best_score = scores.iter().min().copied();
    let average_score = if scores.is_empty() {
        None
    } else {
        let mean = f64::from(scores.iter().sum::<u32>()) / scores.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    PlayerStats {
        total_rounds: rounds.len() as u32,
        best_score,
        average_score,
        last_played: rounds.first().map(|r| r.round_date),
    }
}
