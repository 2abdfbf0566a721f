//! Handlers for domain events dispatched by the backend.
//!
//! These sit between the store and the computation core: the backend tells
//! us something happened (an account was created, a round was recorded, a
//! friend request came in) and the handler reads what it needs, runs the
//! pure calculations and writes the outcome back. None of the handlers
//! keep state between invocations.

use crate::core::friends::{FriendRequestError, Friendship, FriendshipStatus, FriendshipStore};
use crate::core::handicap::{self, MAX_HANDICAP, RECENT_ROUNDS_WINDOW};
use crate::core::profile::{PlayerStats, Profile, ProfileStore};
use crate::core::round::{Round, RoundProvider};
use anyhow::Result;
use tracing::{debug, info};

/// Creates the default profile for a freshly signed-up account.
///
/// The username defaults to the local part of the email address and the
/// handicap starts at the 54.0 maximum until enough rounds come in.
pub async fn handle_account_created(
    profiles: &dyn ProfileStore,
    user_id: &str,
    email: &str,
    display_name: Option<&str>,
) -> Result<()> {
    let username = email.split('@').next().unwrap_or(email).to_string();
    let profile = Profile {
        user_id: user_id.to_string(),
        email: Some(email.to_string()),
        name: display_name.unwrap_or_default().to_string(),
        username,
        handicap: MAX_HANDICAP,
        is_public: true,
        stats: PlayerStats::default(),
    };

    profiles.create_profile(&profile).await?;
    info!(user_id, "Created user profile");
    Ok(())
}

/// Recomputes a player's handicap index and stats after a new round lands
/// in the store.
///
/// The whole snapshot is rebuilt from the most recent rounds (which
/// already include the new one); nothing incremental is carried over.
/// Concurrent invocations for the same user are last-writer-wins; callers
/// that care must serialize.
pub async fn handle_round_recorded(
    rounds: &dyn RoundProvider,
    profiles: &dyn ProfileStore,
    round: &Round,
) -> Result<()> {
    let history = rounds
        .fetch_recent_rounds(&round.user_id, RECENT_ROUNDS_WINDOW)
        .await?;
    debug!(
        user_id = %round.user_id,
        rounds = history.len(),
        "Recomputing handicap"
    );

    let index = handicap::compute_handicap_index(&history);
    let stats = handicap::compute_stats(&history);

    profiles
        .update_handicap(&round.user_id, index, &stats)
        .await?;
    info!(user_id = %round.user_id, handicap = index, "Updated handicap");
    Ok(())
}

/// Records a pending friend request between two users.
///
/// Self-requests and requests where a friendship already exists in either
/// orientation are rejected; store failures pass through unchanged.
pub async fn send_friend_request(
    store: &dyn FriendshipStore,
    requester: &str,
    recipient: &str,
) -> Result<Friendship, FriendRequestError> {
    if requester == recipient {
        return Err(FriendRequestError::SelfRequest);
    }

    if store.find_between(requester, recipient).await?.is_some() {
        return Err(FriendRequestError::AlreadyExists(
            requester.to_string(),
            recipient.to_string(),
        ));
    }

    let friendship = Friendship {
        user_a: requester.to_string(),
        user_b: recipient.to_string(),
        requester: requester.to_string(),
        status: FriendshipStatus::Pending,
    };
    store.create(&friendship).await?;
    info!(requester, recipient, "Friend request sent");
    Ok(friendship)
}
