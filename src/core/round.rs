//! Round records and the read interface to the rounds backend

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single recorded golf round, as stored by the backend.
///
/// Rounds are immutable facts once recorded. `score` and the two course
/// ratings are optional: a round missing a rating still counts toward
/// basic stats, and a round missing a score is skipped by the
/// leaderboard entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub user_id: String,
    pub round_date: NaiveDate,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub course_rating: Option<f64>,
    #[serde(default)]
    pub slope_rating: Option<f64>,
}

impl Round {
    /// Score differential normalized for course difficulty.
    ///
    /// Defined only when the score and both ratings are present.
    pub fn differential(&self) -> Option<f64> {
        let score = self.score?;
        let course_rating = self.course_rating?;
        let slope_rating = self.slope_rating?;
        Some((f64::from(score) - course_rating) * 113.0 / slope_rating)
    }
}

#[async_trait]
pub trait RoundProvider: Send + Sync {
    /// Fetches up to `max_count` of a user's rounds, most recent first.
    async fn fetch_recent_rounds(&self, user_id: &str, max_count: usize) -> Result<Vec<Round>>;

    /// Fetches every round played on or after `start`, across all users.
    async fn fetch_rounds_since(&self, start: NaiveDate) -> Result<Vec<Round>>;
}
