use serde::{Deserialize, Serialize};

use crate::domain::episode::{EpisodeChange, EpisodeMark, EpisodeNumber};
use crate::domain::metadata::SeriesId;
use crate::domain::{DomainError, DomainResult};

/// One tracked series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// Operator-chosen title, matched case-insensitively against announcements
    pub title: String,

    /// Last episode a notification was sent for
    pub last_episode: EpisodeMark,

    /// MyAnimeList identifier used for every metadata lookup
    pub external_id: SeriesId,
}

impl WatchlistEntry {
    /// Create an entry for a series that has not produced an announcement yet
    pub fn new(title: impl Into<String>, external_id: SeriesId) -> Self {
        Self {
            title: title.into(),
            last_episode: EpisodeMark::NotYetAired,
            external_id,
        }
    }

    /// Whether the (already normalized) announcement text mentions this series
    pub fn matches(&self, normalized_text: &str) -> bool {
        let title = self.title.trim().to_lowercase();
        !title.is_empty() && normalized_text.contains(&title)
    }

    pub fn same_title(&self, title: &str) -> bool {
        self.title.trim().to_lowercase() == title.trim().to_lowercase()
    }
}

/// Ordered set of tracked series.
///
/// Order matters: when several titles match one announcement, the earliest
/// entry wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn new(entries: Vec<WatchlistEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WatchlistEntry> {
        self.entries.get(index)
    }

    /// Index of the first entry whose title appears in the text
    pub fn first_match(&self, normalized_text: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.matches(normalized_text))
    }

    pub fn position_by_title(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.same_title(title))
    }

    /// Append a new entry; titles must stay unique.
    pub fn add(&mut self, entry: WatchlistEntry) -> DomainResult<()> {
        if self.position_by_title(&entry.title).is_some() {
            return Err(DomainError::InvariantViolation(format!(
                "'{}' is already tracked",
                entry.title
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Record a newly released episode.
    ///
    /// Refuses anything that is not strictly newer than the recorded episode.
    pub fn record_episode(&mut self, index: usize, episode: EpisodeNumber) -> DomainResult<()> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| DomainError::NotFound(format!("watchlist entry #{}", index)))?;

        match entry.last_episode.compare_announced(episode) {
            EpisodeChange::New => {
                entry.last_episode = EpisodeMark::Aired(episode);
                Ok(())
            }
            _ => Err(DomainError::InvalidStateTransition(format!(
                "'{}' cannot move from episode {} to {}",
                entry.title, entry.last_episode, episode
            ))),
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<WatchlistEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn remove_by_title(&mut self, title: &str) -> Option<WatchlistEntry> {
        let index = self.position_by_title(title)?;
        self.remove(index)
    }
}
