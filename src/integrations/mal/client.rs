// src/integrations/mal/client.rs
//
// MyAnimeList v2 API - primary airing status provider.
//
// Usually fresher than Jikan (which caches MAL pages), but requires a
// client id and is subject to rejection, so callers must be ready to fall
// back to another provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::{AiringStatus, SeriesId};
use crate::error::{AppError, AppResult};
use crate::integrations::traits::AiringStatusProvider;

const PROVIDER: &str = "MyAnimeList";
const DEFAULT_BASE_URL: &str = "https://api.myanimelist.net/v2";

/// MAL's vocabulary for a series that finished airing
pub const FINISHED_AIRING: &str = "finished_airing";

#[derive(Debug, Deserialize)]
struct MalAnime {
    #[allow(dead_code)] // Part of MAL response schema
    id: u32,
    status: String,
    #[serde(default)]
    num_episodes: Option<u32>,
}

pub struct MalClient {
    http_client: Client,
    base_url: String,
    client_id: String,
}

impl MalClient {
    pub fn new(http_client: Client, client_id: impl Into<String>) -> Self {
        Self::with_base_url(http_client, client_id, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        http_client: Client,
        client_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            client_id: client_id.into(),
        }
    }

    async fn get_anime(&self, id: SeriesId) -> AppResult<MalAnime> {
        let url = format!("{}/anime/{}?fields=id,status,num_episodes", self.base_url, id);

        let response = self
            .http_client
            .get(&url)
            .header("X-MAL-CLIENT-ID", &self.client_id)
            .send()
            .await
            .map_err(|e| AppError::metadata(PROVIDER, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::metadata(
                PROVIDER,
                format!("anime {} returned status {}", id, response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::metadata(PROVIDER, format!("unreadable response: {}", e)))
    }
}

/// MAL reports 0 episodes when the total is not known yet
fn known_episode_count(anime: &MalAnime) -> Option<u32> {
    anime.num_episodes.filter(|&n| n > 0)
}

#[async_trait]
impl AiringStatusProvider for MalClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn airing_status(&self, id: SeriesId) -> AppResult<AiringStatus> {
        let anime = self.get_anime(id).await?;
        Ok(AiringStatus::from_provider_status(&anime.status, FINISHED_AIRING))
    }

    async fn episode_count(&self, id: SeriesId) -> AppResult<Option<u32>> {
        let anime = self.get_anime(id).await?;
        Ok(known_episode_count(&anime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_series() {
        let anime: MalAnime =
            serde_json::from_str(r#"{"id": 20, "status": "finished_airing", "num_episodes": 220}"#)
                .unwrap();
        assert!(!AiringStatus::from_provider_status(&anime.status, FINISHED_AIRING).is_airing);
        assert_eq!(known_episode_count(&anime), Some(220));
    }

    #[test]
    fn test_airing_series_without_total() {
        let anime: MalAnime =
            serde_json::from_str(r#"{"id": 21, "status": "currently_airing", "num_episodes": 0}"#)
                .unwrap();
        assert!(AiringStatus::from_provider_status(&anime.status, FINISHED_AIRING).is_airing);
        assert_eq!(known_episode_count(&anime), None);
    }
}
