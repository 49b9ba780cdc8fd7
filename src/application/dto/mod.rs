// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are operator-friendly representations
// - Conversion FROM domain values only (never TO)
// - Rendering to text lives next to the DTO it renders

use std::fmt;

use crate::domain::{EpisodeMark, NextEpisode, SeriesCandidate, WatchlistEntry};

const MAL_ANIME_URL: &str = "https://myanimelist.net/anime/";

// ============================================================================
// WATCHLIST LISTING
// ============================================================================

#[derive(Debug, Clone)]
pub struct TrackedSeriesDto {
    pub title: String,
    pub episode: String,
    pub airing_in: String,
    pub link: String,
    pub next_episode: NextEpisode,
}

impl TrackedSeriesDto {
    pub fn new(entry: &WatchlistEntry, next_episode: NextEpisode) -> Self {
        let episode = match entry.last_episode {
            EpisodeMark::NotYetAired => "Episode Did Not Air".to_string(),
            EpisodeMark::Aired(number) => format!("Episode {}", number),
        };
        Self {
            title: entry.title.clone(),
            episode,
            airing_in: next_episode.describe(),
            link: format!("{}{}", MAL_ANIME_URL, entry.external_id),
            next_episode,
        }
    }

    /// Soonest first; series with nothing scheduled go last.
    pub fn sort_by_next_airing(rows: &mut [TrackedSeriesDto]) {
        rows.sort_by_key(|row| (row.next_episode.is_null, row.next_episode.total_seconds));
    }
}

impl fmt::Display for TrackedSeriesDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n  {}\n  Airing in {}\n  {}",
            self.title, self.episode, self.airing_in, self.link
        )
    }
}

// ============================================================================
// SEARCH RESULTS
// ============================================================================

/// Numbered choices, 1-based, as offered when adding a series.
pub fn render_candidates(candidates: &[SeriesCandidate]) -> String {
    let mut out = String::from("Which Anime to Add?");
    for (i, candidate) in candidates.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", i + 1, candidate.title));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EpisodeNumber, SeriesId};

    #[test]
    fn test_row_rendering() {
        let mut entry = WatchlistEntry::new("Naruto", SeriesId(20));
        entry.last_episode = EpisodeMark::Aired(EpisodeNumber::Integer(6));
        let row = TrackedSeriesDto::new(&entry, NextEpisode::from_seconds(90_060));
        assert_eq!(
            row.to_string(),
            "Naruto\n  Episode 6\n  Airing in 1 days, 1 hours and 1 minutes\n  https://myanimelist.net/anime/20"
        );
    }

    #[test]
    fn test_not_yet_aired_row() {
        let entry = WatchlistEntry::new("Bleach", SeriesId(269));
        let row = TrackedSeriesDto::new(&entry, NextEpisode::null());
        assert_eq!(row.episode, "Episode Did Not Air");
        assert_eq!(row.airing_in, "N/A");
    }

    #[test]
    fn test_unscheduled_series_sort_last() {
        let a = TrackedSeriesDto::new(&WatchlistEntry::new("A", SeriesId(1)), NextEpisode::null());
        let b = TrackedSeriesDto::new(
            &WatchlistEntry::new("B", SeriesId(2)),
            NextEpisode::from_seconds(3_600),
        );
        let c = TrackedSeriesDto::new(
            &WatchlistEntry::new("C", SeriesId(3)),
            NextEpisode::from_seconds(60),
        );
        let mut rows = vec![a, b, c];
        TrackedSeriesDto::sort_by_next_airing(&mut rows);
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_candidates_are_numbered_from_one() {
        let candidates = vec![
            SeriesCandidate { id: SeriesId(20), title: "Naruto".to_string() },
            SeriesCandidate { id: SeriesId(1735), title: "Naruto: Shippuuden".to_string() },
        ];
        assert_eq!(
            render_candidates(&candidates),
            "Which Anime to Add?\n1. Naruto\n2. Naruto: Shippuuden"
        );
    }
}
