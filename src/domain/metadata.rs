// src/domain/metadata.rs
//
// Metadata value objects
//
// Provider-neutral shapes. Integrations translate their own vocabularies into
// these; nothing above the integration layer sees a provider's raw status.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::episode::EpisodeNumber;

/// MyAnimeList series identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(pub u32);

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a series is still airing, re-derived on every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiringStatus {
    pub is_airing: bool,
}

impl AiringStatus {
    pub fn airing() -> Self {
        Self { is_airing: true }
    }

    pub fn finished() -> Self {
        Self { is_airing: false }
    }

    /// Normalize a provider's raw status string given its "finished" sentinel.
    pub fn from_provider_status(raw: &str, finished_sentinel: &str) -> Self {
        Self {
            is_airing: raw != finished_sentinel,
        }
    }
}

/// Episode count reported when a series ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FinalEpisode {
    Known(EpisodeNumber),
    Unknown,
}

impl fmt::Display for FinalEpisode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalEpisode::Known(number) => write!(f, "{}", number),
            FinalEpisode::Unknown => write!(f, "unknown"),
        }
    }
}

/// Time until the next episode airs.
///
/// `is_null` means the provider has no upcoming episode scheduled, which is
/// not the same thing as an episode airing right now (`total_seconds == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextEpisode {
    pub is_null: bool,
    pub total_seconds: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl NextEpisode {
    pub fn null() -> Self {
        Self {
            is_null: true,
            total_seconds: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    pub fn from_seconds(total_seconds: i64) -> Self {
        let delta = TimeDelta::seconds(total_seconds);
        Self {
            is_null: false,
            total_seconds,
            days: delta.num_days(),
            hours: delta.num_hours() % 24,
            minutes: delta.num_minutes() % 60,
            seconds: delta.num_seconds() % 60,
        }
    }

    /// Human rendering, coarsest non-zero unit first.
    pub fn describe(&self) -> String {
        if self.is_null {
            "N/A".to_string()
        } else if self.days == 0 && self.hours == 0 && self.minutes == 0 {
            format!("{} seconds", self.seconds)
        } else if self.days == 0 && self.hours == 0 {
            format!("{} minutes", self.minutes)
        } else if self.days == 0 {
            format!("{} hours and {} minutes", self.hours, self.minutes)
        } else {
            format!(
                "{} days, {} hours and {} minutes",
                self.days, self.hours, self.minutes
            )
        }
    }
}

/// A search hit offered to the operator when adding a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCandidate {
    pub id: SeriesId,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_normalization() {
        assert!(!AiringStatus::from_provider_status("finished_airing", "finished_airing").is_airing);
        assert!(AiringStatus::from_provider_status("currently_airing", "finished_airing").is_airing);
        assert!(AiringStatus::from_provider_status("Not yet aired", "Finished Airing").is_airing);
    }

    #[test]
    fn test_next_episode_breakdown() {
        let next = NextEpisode::from_seconds(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        assert!(!next.is_null);
        assert_eq!((next.days, next.hours, next.minutes, next.seconds), (2, 3, 4, 5));
    }

    #[test]
    fn test_zero_is_not_null() {
        let next = NextEpisode::from_seconds(0);
        assert!(!next.is_null);
        assert_eq!(next.describe(), "0 seconds");
        assert_eq!(NextEpisode::null().describe(), "N/A");
    }

    #[test]
    fn test_describe_units() {
        assert_eq!(NextEpisode::from_seconds(59).describe(), "59 seconds");
        assert_eq!(NextEpisode::from_seconds(125).describe(), "2 minutes");
        assert_eq!(NextEpisode::from_seconds(3_660).describe(), "1 hours and 1 minutes");
        assert_eq!(
            NextEpisode::from_seconds(90_060).describe(),
            "1 days, 1 hours and 1 minutes"
        );
    }

    #[test]
    fn test_final_episode_display() {
        assert_eq!(FinalEpisode::Known(EpisodeNumber::Integer(12)).to_string(), "12");
        assert_eq!(FinalEpisode::Unknown.to_string(), "unknown");
    }
}
