// src/integrations/anilist/client.rs
//
// AniList API Integration
//
// ARCHITECTURE:
// - GraphQL client for AniList API
// - Handles rate limiting and GraphQL error envelopes
// - Maps external data → domain value objects (NO watchlist mutation)
// - Used by MetadataResolver for airing schedules
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Ids passed in are AniList ids, except in translate_id
// - Caching of id translations belongs to the caller

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::{NextEpisode, SeriesId};
use crate::error::{AppError, AppResult};
use crate::integrations::traits::ScheduleProvider;

const PROVIDER: &str = "AniList";
const DEFAULT_BASE_URL: &str = "https://graphql.anilist.co";

const TRANSLATE_QUERY: &str = r#"
    query ($idMal: Int) {
        Media(idMal: $idMal, type: ANIME) {
            id
        }
    }
"#;

const NEXT_EPISODE_QUERY: &str = r#"
    query ($id: Int) {
        Media(id: $id, type: ANIME) {
            id
            nextAiringEpisode {
                timeUntilAiring
            }
        }
    }
"#;

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
    #[allow(dead_code)] // Part of GraphQL error response schema
    status: Option<i32>,
}

/// Single media query wrapper
#[derive(Debug, Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    id: u32,
    #[serde(rename = "nextAiringEpisode", default)]
    next_airing_episode: Option<NextAiringEpisode>,
}

#[derive(Debug, Deserialize)]
struct NextAiringEpisode {
    #[serde(rename = "timeUntilAiring")]
    time_until_airing: i64,
}

/// Rate limiter state
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new() -> Self {
        Self {
            last_request: None,
            min_interval: Duration::from_millis(700), // AniList allows 90 requests per minute
        }
    }

    async fn wait_if_needed(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// AniList API Client
pub struct AniListClient {
    base_url: String,
    http_client: Client,
    rate_limiter: Mutex<RateLimiter>,
}

impl AniListClient {
    pub fn new(http_client: Client) -> Self {
        Self::with_base_url(http_client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
            rate_limiter: Mutex::new(RateLimiter::new()),
        }
    }

    // ========================================================================
    // INTERNAL: GraphQL Execution
    // ========================================================================

    /// Execute a GraphQL query
    async fn execute_query<T>(&self, query: &str, variables: serde_json::Value) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.rate_limiter.lock().await.wait_if_needed().await;

        let body = json!({
            "query": query,
            "variables": variables
        });

        let response = self
            .http_client
            .post(&self.base_url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::metadata(PROVIDER, format!("request failed: {}", e)))?;

        // AniList reports unknown media as 404 with a GraphQL error body,
        // so the envelope is parsed before looking at the status.
        let status = response.status();
        let graphql_response: GraphQLResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::metadata(PROVIDER, format!("unreadable response ({}): {}", status, e)))?;

        Self::unwrap_response(graphql_response)
    }

    fn unwrap_response<T>(response: GraphQLResponse<T>) -> AppResult<T> {
        if let Some(errors) = response.errors {
            let error_messages: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
            return Err(AppError::metadata(PROVIDER, error_messages.join(", ")));
        }

        response
            .data
            .ok_or_else(|| AppError::metadata(PROVIDER, "returned no data"))
    }

    fn map_next_episode(media: Media) -> NextEpisode {
        match media.next_airing_episode {
            Some(next) => NextEpisode::from_seconds(next.time_until_airing),
            None => NextEpisode::null(),
        }
    }
}

#[async_trait]
impl ScheduleProvider for AniListClient {
    async fn translate_id(&self, id: SeriesId) -> AppResult<u32> {
        let data: MediaData = self
            .execute_query(TRANSLATE_QUERY, json!({ "idMal": id.0 }))
            .await?;

        data.media
            .map(|media| media.id)
            .ok_or_else(|| AppError::metadata(PROVIDER, format!("no media for MAL id {}", id)))
    }

    async fn time_until_next_episode(&self, schedule_id: u32) -> AppResult<NextEpisode> {
        let data: MediaData = self
            .execute_query(NEXT_EPISODE_QUERY, json!({ "id": schedule_id }))
            .await?;

        // A missing media object is treated like a missing schedule.
        Ok(data
            .media
            .map(Self::map_next_episode)
            .unwrap_or_else(NextEpisode::null))
    }
}
