// src/services/reconciliation_service.rs
//
// Reconciliation Service - the polling loop
//
// CRITICAL RULES:
// - Single task: the only writer of episode progress, the only producer of
//   notifications
// - Every detected change is saved before it is announced, one save per
//   change, never batched
// - The watchlist is re-read under the store lock for every announcement,
//   and again before the change is written
// - The store lock is never held across a network call
// - Sleeps (failure backoff, tick interval, sweep pacing) are the only
//   suspension points besides the network calls themselves

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    parse_episode_token, AnnouncementFragment, EndDetection, EpisodeChange, EpisodeReleased,
    FinalEpisode, SeriesEnded,
};
use crate::error::{AppError, AppResult, ScrapeError};
use crate::integrations::{Notifier, PageScraper};
use crate::repositories::WatchlistRepository;
use crate::services::metadata_resolver::{MetadataResolver, ProviderChoice};

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Random pause before retrying a failed listing fetch
    pub failure_backoff: (Duration, Duration),
    /// Random pause between ticks
    pub tick_interval: (Duration, Duration),
    /// Pause after each sweep status query (secondary provider rate limit)
    pub sweep_pause: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            failure_backoff: (Duration::from_secs(150), Duration::from_secs(300)),
            tick_interval: (Duration::from_secs(300), Duration::from_secs(600)),
            sweep_pause: Duration::from_millis(340),
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fragments: usize,
    pub episodes_notified: usize,
    pub ended_by_announcement: usize,
    pub ended_by_sweep: usize,
}

pub struct ReconciliationService {
    watchlist_repo: Arc<dyn WatchlistRepository>,
    scraper: Arc<dyn PageScraper>,
    resolver: Arc<MetadataResolver>,
    notifier: Arc<dyn Notifier>,
    config: ReconcilerConfig,
    last_failure: Option<ScrapeError>,
}

impl ReconciliationService {
    pub fn new(
        watchlist_repo: Arc<dyn WatchlistRepository>,
        scraper: Arc<dyn PageScraper>,
        resolver: Arc<MetadataResolver>,
        notifier: Arc<dyn Notifier>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            watchlist_repo,
            scraper,
            resolver,
            notifier,
            config,
            last_failure: None,
        }
    }

    /// Tick forever. Returns only when the listing fetch trips the circuit
    /// breaker; any other tick failure is logged and retried next interval.
    pub async fn run(&mut self) -> AppResult<()> {
        log::info!("Reconciliation loop started");
        loop {
            match self.tick().await {
                Ok(report) => log::info!(
                    "Tick done: {} announcements, {} new episodes, {} series ended ({} by sweep)",
                    report.fragments,
                    report.episodes_notified,
                    report.ended_by_announcement + report.ended_by_sweep,
                    report.ended_by_sweep
                ),
                Err(e @ AppError::CircuitOpen(_)) => {
                    log::error!("Shutting down: {}", e);
                    return Err(e);
                }
                Err(e) => log::error!("Tick aborted, durable state kept: {}", e),
            }

            let pause = jitter(self.config.tick_interval);
            log::debug!("Next tick in {}s", pause.as_secs());
            tokio::time::sleep(pause).await;
        }
    }

    /// One pass: announcements first, then the status sweep.
    pub async fn tick(&mut self) -> AppResult<TickReport> {
        let fragments = self.fetch_announcements().await?;
        let mut report = TickReport {
            fragments: fragments.len(),
            ..TickReport::default()
        };

        for fragment in &fragments {
            self.process_fragment(fragment, &mut report).await?;
        }

        self.sweep(&mut report).await?;
        Ok(report)
    }

    /// Fetch the listing, backing off on failure. The same cause twice in a
    /// row means the upstream is not coming back, and the loop gives up.
    async fn fetch_announcements(&mut self) -> AppResult<Vec<AnnouncementFragment>> {
        loop {
            match self.scraper.list_announcements().await {
                Ok(fragments) => {
                    self.last_failure = None;
                    return Ok(fragments);
                }
                Err(e) => {
                    let cause = scrape_cause(&e);
                    if self.last_failure.as_ref() == Some(&cause) {
                        return Err(AppError::CircuitOpen(cause));
                    }

                    let backoff = jitter(self.config.failure_backoff);
                    log::warn!(
                        "Fetching announcements failed ({}), retrying in {}s",
                        e,
                        backoff.as_secs()
                    );
                    self.last_failure = Some(cause);
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn process_fragment(
        &self,
        fragment: &AnnouncementFragment,
        report: &mut TickReport,
    ) -> AppResult<()> {
        let text = fragment.normalized_text();

        // Read pass. The lock is not held across the lookups below.
        let watchlist = {
            let _guard = self.watchlist_repo.lock()?;
            self.watchlist_repo.load()?
        };

        let Some(entry) = watchlist
            .first_match(&text)
            .and_then(|index| watchlist.get(index))
            .cloned()
        else {
            return Ok(());
        };

        let Some(episode) = parse_episode_token(&text) else {
            log::warn!("'{}' matched '{}' but carries no episode number", text, entry.title);
            return Ok(());
        };

        match entry.last_episode.compare_announced(episode) {
            EpisodeChange::New => {}
            EpisodeChange::Unchanged => return Ok(()),
            EpisodeChange::Stale => {
                log::debug!(
                    "Ignoring '{}': {} is already at episode {}",
                    text,
                    entry.title,
                    entry.last_episode
                );
                return Ok(());
            }
        }

        let video_link = match self.scraper.extract_video_link(&fragment.detail_link).await {
            Ok(link) => link,
            Err(e) => {
                log::warn!(
                    "No video link for {} episode {} ({}), using the detail page",
                    entry.title,
                    episode,
                    e
                );
                fragment.detail_link.clone()
            }
        };

        let still_airing = match self
            .resolver
            .airing_status(entry.external_id, ProviderChoice::Primary)
            .await
        {
            Ok(status) => status.is_airing,
            Err(e) => {
                log::warn!("Airing status for {} unavailable, assuming airing: {}", entry.title, e);
                true
            }
        };

        // Write pass: reload and re-check, the entry may have moved on or
        // been removed while the lookups ran.
        let committed = {
            let _guard = self.watchlist_repo.lock()?;
            let mut watchlist = self.watchlist_repo.load()?;
            let index = watchlist.position_by_title(&entry.title).filter(|&index| {
                watchlist
                    .get(index)
                    .map(|current| current.last_episode.compare_announced(episode) == EpisodeChange::New)
                    .unwrap_or(false)
            });

            match index {
                Some(index) => {
                    if still_airing {
                        watchlist.record_episode(index, episode)?;
                    } else {
                        watchlist.remove(index);
                    }
                    self.watchlist_repo.save(&watchlist)?;
                    true
                }
                None => false,
            }
        };

        if !committed {
            log::debug!(
                "{} changed while episode {} was being resolved, skipping",
                entry.title,
                episode
            );
            return Ok(());
        }

        log::info!("Anime '{}' has aired a new episode: {}", entry.title, episode);

        let released = EpisodeReleased {
            series: entry.title.clone(),
            series_id: entry.external_id,
            episode,
            video_link,
            still_airing,
        };
        if let Err(e) = self.notifier.notify_episode(&released).await {
            log::error!("Failed to announce {} episode {}: {}", entry.title, episode, e);
        }
        report.episodes_notified += 1;

        if !still_airing {
            self.announce_end(SeriesEnded {
                series: entry.title,
                series_id: entry.external_id,
                final_episode: FinalEpisode::Known(episode),
                detected_by: EndDetection::Announcement,
            })
            .await;
            report.ended_by_announcement += 1;
        }

        Ok(())
    }

    /// Authoritative status check of every remaining entry, paced for the
    /// secondary provider. Catches series whose last episode never showed up
    /// as a recognizable announcement.
    async fn sweep(&self, report: &mut TickReport) -> AppResult<()> {
        let snapshot = {
            let _guard = self.watchlist_repo.lock()?;
            self.watchlist_repo.load()?
        };

        let mut finished = Vec::new();
        for entry in snapshot.entries() {
            let status = self
                .resolver
                .airing_status(entry.external_id, ProviderChoice::Secondary)
                .await;
            tokio::time::sleep(self.config.sweep_pause).await;

            match status {
                Ok(status) if status.is_airing => {}
                Ok(_) => finished.push(entry.clone()),
                Err(e) => log::warn!("Sweep status check for {} failed: {}", entry.title, e),
            }
        }

        for entry in finished {
            let removed = {
                let _guard = self.watchlist_repo.lock()?;
                let mut watchlist = self.watchlist_repo.load()?;
                let removed = watchlist.remove_by_title(&entry.title);
                if removed.is_some() {
                    self.watchlist_repo.save(&watchlist)?;
                }
                removed
            };

            let Some(removed) = removed else {
                log::debug!("{} left the watchlist during the sweep", entry.title);
                continue;
            };

            let final_episode = self.resolver.final_episode_count(removed.external_id).await;
            self.announce_end(SeriesEnded {
                series: removed.title,
                series_id: removed.external_id,
                final_episode,
                detected_by: EndDetection::Sweep,
            })
            .await;
            report.ended_by_sweep += 1;
        }

        Ok(())
    }

    async fn announce_end(&self, event: SeriesEnded) {
        log::info!(
            "Anime '{}' is no longer airing at episode '{}' (noticed by {})",
            event.series,
            event.final_episode,
            event.detected_by
        );
        if let Err(e) = self.notifier.notify_series_ended(&event).await {
            log::error!("Failed to announce end of {}: {}", event.series, e);
        }
    }
}

/// Reduce a listing failure to the cause the circuit breaker compares.
fn scrape_cause(err: &AppError) -> ScrapeError {
    match err {
        AppError::Scrape(cause) => cause.clone(),
        AppError::Http(e) => ScrapeError::from(e),
        other => ScrapeError::Markup(other.to_string()),
    }
}

/// Uniformly random duration within the inclusive range.
fn jitter((min, max): (Duration, Duration)) -> Duration {
    if max <= min {
        return min;
    }
    let low = min.as_millis() as u64;
    let high = max.as_millis() as u64;
    Duration::from_millis(rand::thread_rng().gen_range(low..=high))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_stays_in_range() {
        let range = (Duration::from_secs(150), Duration::from_secs(300));
        for _ in 0..100 {
            let pause = jitter(range);
            assert!(pause >= range.0 && pause <= range.1);
        }
    }

    #[test]
    fn test_jitter_degenerate_range() {
        let d = Duration::from_secs(5);
        assert_eq!(jitter((d, d)), d);
        assert_eq!(jitter((d, Duration::from_secs(1))), d);
    }

    #[test]
    fn test_scrape_cause_passthrough() {
        let err = AppError::Scrape(ScrapeError::Status(403));
        assert_eq!(scrape_cause(&err), ScrapeError::Status(403));
    }
}
