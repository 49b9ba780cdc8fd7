// src/integrations/jikan/client.rs
//
// Jikan v4 (unofficial MyAnimeList mirror) - secondary airing status
// provider and title search.
//
// Jikan allows roughly three requests per second; callers issuing bursts
// are expected to pace themselves.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::{AiringStatus, SeriesCandidate, SeriesId};
use crate::error::{AppError, AppResult};
use crate::integrations::traits::{AiringStatusProvider, SeriesSearch};

const PROVIDER: &str = "Jikan";
const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";
const SEARCH_LIMIT: &str = "10";

/// Jikan's vocabulary for a series that finished airing
pub const FINISHED_AIRING: &str = "Finished Airing";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct JikanAnime {
    mal_id: u32,
    title: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    episodes: Option<u32>,
}

impl From<JikanAnime> for SeriesCandidate {
    fn from(anime: JikanAnime) -> Self {
        SeriesCandidate {
            id: SeriesId(anime.mal_id),
            title: anime.title,
        }
    }
}

pub struct JikanClient {
    http_client: Client,
    base_url: String,
}

impl JikanClient {
    pub fn new(http_client: Client) -> Self {
        Self::with_base_url(http_client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    async fn get<T>(&self, url: &str, query: &[(&str, &str)]) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::metadata(PROVIDER, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::metadata(
                PROVIDER,
                format!("{} returned status {}", url, response.status()),
            ));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::metadata(PROVIDER, format!("unreadable response: {}", e)))?;
        Ok(envelope.data)
    }

    async fn get_anime(&self, id: SeriesId) -> AppResult<JikanAnime> {
        self.get(&format!("{}/anime/{}", self.base_url, id), &[]).await
    }
}

fn normalize_status(anime: &JikanAnime) -> AppResult<AiringStatus> {
    let status = anime.status.as_deref().ok_or_else(|| {
        AppError::metadata(PROVIDER, format!("anime {} has no status", anime.mal_id))
    })?;
    Ok(AiringStatus::from_provider_status(status, FINISHED_AIRING))
}

#[async_trait]
impl AiringStatusProvider for JikanClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn airing_status(&self, id: SeriesId) -> AppResult<AiringStatus> {
        let anime = self.get_anime(id).await?;
        normalize_status(&anime)
    }

    async fn episode_count(&self, id: SeriesId) -> AppResult<Option<u32>> {
        let anime = self.get_anime(id).await?;
        Ok(anime.episodes.filter(|&n| n > 0))
    }
}

#[async_trait]
impl SeriesSearch for JikanClient {
    async fn search(&self, query: &str) -> AppResult<Vec<SeriesCandidate>> {
        let results: Vec<JikanAnime> = self
            .get(
                &format!("{}/anime", self.base_url),
                &[("q", query), ("limit", SEARCH_LIMIT)],
            )
            .await?;

        Ok(results.into_iter().map(SeriesCandidate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_anime_envelope() {
        let envelope: Envelope<JikanAnime> = serde_json::from_str(
            r#"{"data": {"mal_id": 20, "title": "Naruto", "status": "Finished Airing", "episodes": 220}}"#,
        )
        .unwrap();
        let status = normalize_status(&envelope.data).unwrap();
        assert!(!status.is_airing);
    }

    #[test]
    fn test_not_yet_aired_counts_as_airing() {
        let anime: JikanAnime =
            serde_json::from_str(r#"{"mal_id": 1, "title": "X", "status": "Not yet aired"}"#).unwrap();
        assert!(normalize_status(&anime).unwrap().is_airing);
    }

    #[test]
    fn test_missing_status_is_an_error() {
        let anime: JikanAnime = serde_json::from_str(r#"{"mal_id": 1, "title": "X"}"#).unwrap();
        assert!(normalize_status(&anime).is_err());
    }

    #[test]
    fn test_search_envelope_maps_to_candidates() {
        let envelope: Envelope<Vec<JikanAnime>> = serde_json::from_str(
            r#"{"data": [
                {"mal_id": 20, "title": "Naruto", "status": "Finished Airing"},
                {"mal_id": 1735, "title": "Naruto: Shippuuden", "status": "Finished Airing"}
            ], "pagination": {"has_next_page": false}}"#,
        )
        .unwrap();
        let candidates: Vec<SeriesCandidate> =
            envelope.data.into_iter().map(SeriesCandidate::from).collect();
        assert_eq!(candidates[1].id, SeriesId(1735));
        assert_eq!(candidates[0].title, "Naruto");
    }
}
