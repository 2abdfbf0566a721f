//! Player profiles and the profile side of the backend store

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Summary statistics recomputed in full every time a round is recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub total_rounds: u32,
    pub best_score: Option<u32>,
    pub average_score: Option<f64>,
    pub last_played: Option<NaiveDate>,
}

/// A user's profile document as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub name: String,
    pub username: String,
    pub handicap: f64,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub stats: PlayerStats,
}

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Looks up a profile by user id. An absent profile is `Ok(None)`,
    /// not an error; only transport failures return `Err`.
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>>;
}

/// Write side of the profile store, used by the event handlers.
#[async_trait]
pub trait ProfileStore: ProfileProvider {
    async fn create_profile(&self, profile: &Profile) -> Result<()>;

    /// Overwrites a user's handicap index and stats snapshot.
    async fn update_handicap(&self, user_id: &str, index: f64, stats: &PlayerStats) -> Result<()>;
}
