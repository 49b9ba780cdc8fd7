// src/services/metadata_resolver.rs
//
// Metadata Resolver - single entry point for series metadata
//
// RULES:
// - Airing status: primary provider first, secondary on any failure
// - Provider vocabularies never leak past this point
// - Id translations for the schedule provider go through the injected cache

use std::sync::Arc;

use crate::domain::{AiringStatus, EpisodeNumber, FinalEpisode, NextEpisode, SeriesId};
use crate::error::AppResult;
use crate::integrations::{AiringStatusProvider, ScheduleProvider};
use crate::services::id_cache::IdTranslationCache;

/// Which provider chain an airing-status lookup goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    /// Primary, falling back to secondary
    Primary,
    /// Secondary only
    Secondary,
}

pub struct MetadataResolver {
    primary: Arc<dyn AiringStatusProvider>,
    secondary: Arc<dyn AiringStatusProvider>,
    schedule: Arc<dyn ScheduleProvider>,
    id_cache: Arc<IdTranslationCache>,
}

impl MetadataResolver {
    pub fn new(
        primary: Arc<dyn AiringStatusProvider>,
        secondary: Arc<dyn AiringStatusProvider>,
        schedule: Arc<dyn ScheduleProvider>,
        id_cache: Arc<IdTranslationCache>,
    ) -> Self {
        Self {
            primary,
            secondary,
            schedule,
            id_cache,
        }
    }

    pub async fn airing_status(&self, id: SeriesId, choice: ProviderChoice) -> AppResult<AiringStatus> {
        if choice == ProviderChoice::Primary {
            match self.primary.airing_status(id).await {
                Ok(status) => return Ok(status),
                Err(e) => log::warn!(
                    "{} status check for {} failed, switching to {}: {}",
                    self.primary.name(),
                    id,
                    self.secondary.name(),
                    e
                ),
            }
        }
        self.secondary.airing_status(id).await
    }

    /// Best-effort episode total for a finished series.
    pub async fn final_episode_count(&self, id: SeriesId) -> FinalEpisode {
        for provider in [&self.primary, &self.secondary] {
            match provider.episode_count(id).await {
                Ok(Some(count)) => return FinalEpisode::Known(EpisodeNumber::Integer(count)),
                Ok(None) => log::debug!("{} has no episode count for {}", provider.name(), id),
                Err(e) => log::warn!("{} episode count for {} failed: {}", provider.name(), id, e),
            }
        }
        FinalEpisode::Unknown
    }

    pub async fn time_until_next_episode(&self, id: SeriesId) -> AppResult<NextEpisode> {
        let schedule_id = match self.id_cache.get(id) {
            Some(schedule_id) => schedule_id,
            None => {
                let schedule_id = self.schedule.translate_id(id).await?;
                self.id_cache.insert(id, schedule_id);
                schedule_id
            }
        };
        self.schedule.time_until_next_episode(schedule_id).await
    }
}
