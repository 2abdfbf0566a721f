//! HTTP implementation of the store interfaces against the rounds
//! backend, a JSON REST service fronting the document store.

use crate::core::cache::Cache;
use crate::core::friends::{Friendship, FriendshipStore};
use crate::core::profile::{PlayerStats, Profile, ProfileProvider, ProfileStore};
use crate::core::round::{Round, RoundProvider};
use crate::providers::util::with_retry;
use crate::store::MemoryCache;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Profiles change rarely outside handicap updates, which we invalidate
/// ourselves, so a short TTL is enough to dedupe lookups within a run.
const PROFILE_CACHE_TTL: Duration = Duration::from_secs(300);

const REQUEST_ATTEMPTS: usize = 3;
const RETRY_DELAY_MS: u64 = 500;

pub struct RestBackend {
    base_url: String,
    profile_cache: MemoryCache<String, Profile>,
}

impl RestBackend {
    pub fn new(base_url: &str) -> Self {
        RestBackend {
            base_url: base_url.trim_end_matches('/').to_string(),
            profile_cache: MemoryCache::new(),
        }
    }

    fn client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .user_agent("fairway/0.2")
            .build()?)
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let client = self.client()?;
        let response = with_retry(
            || async { client.get(url).query(query).send().await },
            REQUEST_ATTEMPTS,
            RETRY_DELAY_MS,
        )
        .await
        .with_context(|| format!("Failed to send request to {url}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {url}"))?;
        if !status.is_success() {
            return Err(anyhow!("Backend returned {status} for {url}: '{text}'"));
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HandicapUpdate<'a> {
    handicap: f64,
    stats: &'a PlayerStats,
}

#[async_trait]
impl RoundProvider for RestBackend {
    async fn fetch_recent_rounds(&self, user_id: &str, max_count: usize) -> Result<Vec<Round>> {
        let url = format!("{}/rounds", self.base_url);
        debug!("Requesting recent rounds for {} from {}", user_id, url);

        let query = [
            ("user", user_id.to_string()),
            ("limit", max_count.to_string()),
        ];
        let text = self.get_text(&url, &query).await?;
        let rounds: Vec<Round> = serde_json::from_str(&text).with_context(|| {
            format!("Failed to parse rounds for user: {user_id}. Response: '{text}'")
        })?;

        debug!(
            "Fetched {} recent rounds for user {}",
            rounds.len(),
            user_id
        );
        Ok(rounds)
    }

    async fn fetch_rounds_since(&self, start: NaiveDate) -> Result<Vec<Round>> {
        let url = format!("{}/rounds", self.base_url);
        debug!("Requesting rounds since {} from {}", start, url);

        let query = [("since", start.format("%Y-%m-%d").to_string())];
        let text = self.get_text(&url, &query).await?;
        let rounds: Vec<Round> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse rounds since {start}. Response: '{text}'"))?;

        debug!("Fetched {} rounds since {}", rounds.len(), start);
        Ok(rounds)
    }
}

#[async_trait]
impl ProfileProvider for RestBackend {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        if let Some(cached) = self.profile_cache.get(&user_id.to_string()).await {
            return Ok(Some(cached));
        }

        let url = format!("{}/users/{}", self.base_url, user_id);
        debug!("Requesting profile from {}", url);

        let client = self.client()?;
        let response = with_retry(
            || async { client.get(&url).send().await },
            REQUEST_ATTEMPTS,
            RETRY_DELAY_MS,
        )
        .await
        .with_context(|| format!("Failed to send request for user: {user_id}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("No profile document for user {}", user_id);
            return Ok(None);
        }
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read profile response for user: {user_id}"))?;
        if !status.is_success() {
            return Err(anyhow!(
                "Backend returned {status} for user {user_id}: '{text}'"
            ));
        }

        let profile: Profile = serde_json::from_str(&text).with_context(|| {
            format!("Failed to parse profile for user: {user_id}. Response: '{text}'")
        })?;

        self.profile_cache
            .put(
                user_id.to_string(),
                profile.clone(),
                Some(PROFILE_CACHE_TTL),
            )
            .await;
        Ok(Some(profile))
    }
}

#[async_trait]
impl ProfileStore for RestBackend {
    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        let url = format!("{}/users", self.base_url);
        debug!("Creating profile for {} at {}", profile.user_id, url);

        self.client()?
            .post(&url)
            .json(profile)
            .send()
            .await
            .with_context(|| format!("Failed to create profile for user: {}", profile.user_id))?
            .error_for_status()
            .with_context(|| format!("Backend rejected profile for user: {}", profile.user_id))?;
        Ok(())
    }

    async fn update_handicap(&self, user_id: &str, index: f64, stats: &PlayerStats) -> Result<()> {
        let url = format!("{}/users/{}/handicap", self.base_url, user_id);
        debug!("Updating handicap for {} at {}", user_id, url);

        self.client()?
            .patch(&url)
            .json(&HandicapUpdate {
                handicap: index,
                stats,
            })
            .send()
            .await
            .with_context(|| format!("Failed to update handicap for user: {user_id}"))?
            .error_for_status()
            .with_context(|| format!("Backend rejected handicap update for user: {user_id}"))?;

        // The cached document is stale now
        self.profile_cache.remove(&user_id.to_string()).await;
        Ok(())
    }
}

#[async_trait]
impl FriendshipStore for RestBackend {
    async fn find_between(&self, user_a: &str, user_b: &str) -> Result<Option<Friendship>> {
        let url = format!("{}/friendships", self.base_url);
        let query = [
            ("user1", user_a.to_string()),
            ("user2", user_b.to_string()),
        ];
        let text = self.get_text(&url, &query).await?;
        let friendships: Vec<Friendship> = serde_json::from_str(&text).with_context(|| {
            format!("Failed to parse friendships for {user_a}/{user_b}. Response: '{text}'")
        })?;
        Ok(friendships.into_iter().next())
    }

    async fn create(&self, friendship: &Friendship) -> Result<()> {
        let url = format!("{}/friendships", self.base_url);
        debug!(
            "Creating friendship {} -> {} at {}",
            friendship.user_a, friendship.user_b, url
        );

        self.client()?
            .post(&url)
            .json(friendship)
            .send()
            .await
            .context("Failed to create friendship")?
            .error_for_status()
            .context("Backend rejected friendship")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_JSON: &str = r#"{
        "userId": "u1",
        "name": "Sam Snead",
        "username": "sam",
        "handicap": 12.4,
        "isPublic": true
    }"#;

    async fn server_with_profile(user_id: &str, body: &str, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/users/{user_id}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_fetch_profile_success() {
        let server = server_with_profile("u1", PROFILE_JSON, 200).await;
        let backend = RestBackend::new(&server.uri());

        let profile = backend.fetch_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.username, "sam");
        assert_eq!(profile.handicap, 12.4);
    }

    #[tokio::test]
    async fn test_fetch_profile_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_JSON))
            .expect(1)
            .mount(&server)
            .await;
        let backend = RestBackend::new(&server.uri());

        backend.fetch_profile("u1").await.unwrap().unwrap();
        // Second lookup must come from the cache; the mock verifies the
        // hit count on drop
        backend.fetch_profile("u1").await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_fetch_profile_absent_is_none() {
        let server = server_with_profile("ghost", "not found", 404).await;
        let backend = RestBackend::new(&server.uri());

        let profile = backend.fetch_profile("ghost").await.unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_fetch_profile_server_error() {
        let server = server_with_profile("u1", "boom", 500).await;
        let backend = RestBackend::new(&server.uri());

        let result = backend.fetch_profile("u1").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_profile_malformed_response() {
        let server = server_with_profile("u1", r#"{"nope": true}"#, 200).await;
        let backend = RestBackend::new(&server.uri());

        let result = backend.fetch_profile("u1").await;
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Failed to parse profile for user: u1"));
        assert!(message.contains(r#"{"nope": true}"#));
    }

    #[tokio::test]
    async fn test_fetch_recent_rounds_passes_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rounds"))
            .and(query_param("user", "u1"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"userId": "u1", "roundDate": "2024-06-02", "score": 82},
                    {"userId": "u1", "roundDate": "2024-06-01", "score": 85}]"#,
            ))
            .mount(&server)
            .await;
        let backend = RestBackend::new(&server.uri());

        let rounds = backend.fetch_recent_rounds("u1", 20).await.unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].score, Some(82));
    }

    #[tokio::test]
    async fn test_fetch_rounds_since_formats_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rounds"))
            .and(query_param("since", "2024-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;
        let backend = RestBackend::new(&server.uri());

        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rounds = backend.fetch_rounds_since(start).await.unwrap();
        assert!(rounds.is_empty());
    }

    #[tokio::test]
    async fn test_update_handicap_invalidates_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_JSON))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/users/u1/handicap"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        let backend = RestBackend::new(&server.uri());

        backend.fetch_profile("u1").await.unwrap();
        backend
            .update_handicap("u1", 11.8, &PlayerStats::default())
            .await
            .unwrap();
        // Cache was dropped, so this lookup hits the server again
        backend.fetch_profile("u1").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_profile_posts_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        let backend = RestBackend::new(&server.uri());

        let profile = Profile {
            user_id: "u1".to_string(),
            email: Some("sam@example.com".to_string()),
            name: "Sam".to_string(),
            username: "sam".to_string(),
            handicap: 54.0,
            is_public: true,
            stats: PlayerStats::default(),
        };
        backend.create_profile(&profile).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_friendship_between_users() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/friendships"))
            .and(query_param("user1", "u1"))
            .and(query_param("user2", "u2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"userA": "u1", "userB": "u2", "requester": "u1", "status": "pending"}]"#,
            ))
            .mount(&server)
            .await;
        let backend = RestBackend::new(&server.uri());

        let friendship = backend.find_between("u1", "u2").await.unwrap().unwrap();
        assert_eq!(friendship.requester, "u1");
    }
}
