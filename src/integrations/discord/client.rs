// src/integrations/discord/client.rs
//
// Discord channel notifier over the REST API (bot token auth).
// Only message delivery lives here; no gateway connection is opened.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::{json, Value};

use crate::domain::{EpisodeReleased, SeriesEnded};
use crate::error::{AppError, AppResult};
use crate::integrations::traits::Notifier;

const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
const MAL_ANIME_URL: &str = "https://myanimelist.net/anime/";
const EMBED_COLOR: u32 = 0x00FF00;

pub struct DiscordNotifier {
    http_client: Client,
    api_base: String,
    bot_token: String,
    channel_id: u64,
    mention: String,
}

impl DiscordNotifier {
    pub fn new(
        http_client: Client,
        bot_token: impl Into<String>,
        channel_id: u64,
        mention: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_base: DEFAULT_API_BASE.to_string(),
            bot_token: bot_token.into(),
            channel_id,
            mention: mention.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn post_message(&self, body: &Value) -> AppResult<()> {
        let url = format!("{}/channels/{}/messages", self.api_base, self.channel_id);

        let response = self
            .http_client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bot {}", self.bot_token))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Other(format!(
                "Discord API returned status: {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Message body announcing a new episode.
pub fn episode_message(event: &EpisodeReleased, mention: &str) -> Value {
    let mut description = format!("Episode {}", event.episode);
    if !event.still_airing {
        description.push_str(" (Final Episode)");
    }

    json!({
        "content": format!("{} {} Episode {} is airing", mention, event.series, event.episode),
        "embeds": [{
            "title": event.series,
            "description": description,
            "color": EMBED_COLOR,
            "fields": [
                {
                    "name": "MyAnimeList",
                    "value": format!("[Link]({}{})", MAL_ANIME_URL, event.series_id),
                    "inline": false
                },
                {
                    "name": "Episode",
                    "value": format!("[Link]({})", event.video_link),
                    "inline": true
                }
            ]
        }]
    })
}

/// Message body announcing that a series stopped airing.
pub fn series_ended_message(event: &SeriesEnded) -> Value {
    json!({
        "content": format!(
            "Anime '{}' is no longer airing at episode '{}'",
            event.series, event.final_episode
        )
    })
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify_episode(&self, event: &EpisodeReleased) -> AppResult<()> {
        self.post_message(&episode_message(event, &self.mention)).await
    }

    async fn notify_series_ended(&self, event: &SeriesEnded) -> AppResult<()> {
        self.post_message(&series_ended_message(event)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EndDetection, EpisodeNumber, FinalEpisode, SeriesId};

    fn released(still_airing: bool) -> EpisodeReleased {
        EpisodeReleased {
            series: "Naruto".to_string(),
            series_id: SeriesId(20),
            episode: EpisodeNumber::Integer(6),
            video_link: "https://player.example/e/6".to_string(),
            still_airing,
        }
    }

    #[test]
    fn test_episode_message() {
        let body = episode_message(&released(true), "@everyone");
        assert_eq!(body["content"], "@everyone Naruto Episode 6 is airing");
        assert_eq!(body["embeds"][0]["description"], "Episode 6");
        assert_eq!(
            body["embeds"][0]["fields"][0]["value"],
            "[Link](https://myanimelist.net/anime/20)"
        );
    }

    #[test]
    fn test_final_episode_is_flagged() {
        let body = episode_message(&released(false), "@everyone");
        assert_eq!(body["embeds"][0]["description"], "Episode 6 (Final Episode)");
    }

    #[test]
    fn test_series_ended_message_unknown_count() {
        let body = series_ended_message(&SeriesEnded {
            series: "Naruto".to_string(),
            series_id: SeriesId(20),
            final_episode: FinalEpisode::Unknown,
            detected_by: EndDetection::Sweep,
        });
        assert_eq!(
            body["content"],
            "Anime 'Naruto' is no longer airing at episode 'unknown'"
        );
    }
}
