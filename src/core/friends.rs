//! Friendship documents and the friendship side of the backend store

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

/// A friendship link between two users. Created as `Pending` by a friend
/// request; the backend flips it to `Accepted` on mutual consent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub user_a: String,
    pub user_b: String,
    pub requester: String,
    pub status: FriendshipStatus,
}

#[async_trait]
pub trait FriendshipStore: Send + Sync {
    /// Finds an existing friendship between two users in either
    /// orientation.
    async fn find_between(&self, user_a: &str, user_b: &str) -> Result<Option<Friendship>>;

    async fn create(&self, friendship: &Friendship) -> Result<()>;
}

/// Rejections a friend request can produce. Transport failures are kept
/// separate so callers can distinguish "you can't do that" from "the
/// store is down".
#[derive(Debug, thiserror::Error)]
pub enum FriendRequestError {
    #[error("cannot send a friend request to yourself")]
    SelfRequest,
    #[error("friendship between {0} and {1} already exists")]
    AlreadyExists(String, String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
