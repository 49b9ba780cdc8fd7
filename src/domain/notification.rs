use std::fmt;

use crate::domain::episode::EpisodeNumber;
use crate::domain::metadata::{FinalEpisode, SeriesId};

/// A new episode of a tracked series was detected.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReleased {
    pub series: String,
    pub series_id: SeriesId,
    pub episode: EpisodeNumber,
    pub video_link: String,
    pub still_airing: bool,
}

/// A tracked series stopped airing and left the watchlist.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEnded {
    pub series: String,
    pub series_id: SeriesId,
    pub final_episode: FinalEpisode,
    pub detected_by: EndDetection,
}

/// How a series end was noticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDetection {
    /// The announcement of its last episode
    Announcement,
    /// The end-of-tick status sweep
    Sweep,
}

impl fmt::Display for EndDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndDetection::Announcement => write!(f, "final episode announcement"),
            EndDetection::Sweep => write!(f, "status sweep"),
        }
    }
}
