// src/integrations/traits.rs
//
// Seams between the reconciliation core and the outside world.
// Every external service the core talks to is reached through one of these.

use async_trait::async_trait;

use crate::domain::{
    AiringStatus, AnnouncementFragment, EpisodeReleased, NextEpisode, SeriesCandidate, SeriesEnded,
    SeriesId,
};
use crate::error::AppResult;

/// Listing/detail page extraction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Current episode announcements, in page order
    async fn list_announcements(&self) -> AppResult<Vec<AnnouncementFragment>>;

    /// Playable video URL from an announcement's detail page
    async fn extract_video_link(&self, detail_link: &str) -> AppResult<String>;
}

/// A metadata source that knows whether a series is still airing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiringStatusProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn airing_status(&self, id: SeriesId) -> AppResult<AiringStatus>;

    /// Total episode count, when the provider knows it
    async fn episode_count(&self, id: SeriesId) -> AppResult<Option<u32>>;
}

/// Airing schedule lookups keyed by the schedule provider's own ids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// Translate a MyAnimeList id into the provider's id
    async fn translate_id(&self, id: SeriesId) -> AppResult<u32>;

    async fn time_until_next_episode(&self, schedule_id: u32) -> AppResult<NextEpisode>;
}

/// Title search used when the operator adds a series.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeriesSearch: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<Vec<SeriesCandidate>>;
}

/// Delivery of notifications to the chat channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_episode(&self, event: &EpisodeReleased) -> AppResult<()>;

    async fn notify_series_ended(&self, event: &SeriesEnded) -> AppResult<()>;
}
