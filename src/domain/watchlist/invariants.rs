use std::collections::HashSet;

use super::entity::Watchlist;
use crate::domain::{DomainError, DomainResult};

/// Validates all Watchlist invariants
pub fn validate_watchlist(watchlist: &Watchlist) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for entry in watchlist.entries() {
        let title = entry.title.trim().to_lowercase();
        if title.is_empty() {
            return Err(DomainError::InvariantViolation(
                "Watchlist title cannot be empty".to_string(),
            ));
        }
        if !seen.insert(title) {
            return Err(DomainError::InvariantViolation(format!(
                "Watchlist title '{}' appears more than once",
                entry.title
            )));
        }
    }
    Ok(())
}

/// Pairs of titles where one contains the other.
///
/// Matching is by substring, so the earlier entry of such a pair will also
/// claim announcements meant for the later one. Not rejected, only reported.
pub fn overlapping_titles(watchlist: &Watchlist) -> Vec<(String, String)> {
    let entries = watchlist.entries();
    let mut overlaps = Vec::new();
    for (i, a) in entries.iter().enumerate() {
        for b in entries.iter().skip(i + 1) {
            let (la, lb) = (a.title.to_lowercase(), b.title.to_lowercase());
            if la.contains(&lb) || lb.contains(&la) {
                overlaps.push((a.title.clone(), b.title.clone()));
            }
        }
    }
    overlaps
}

/// Invariants that must hold true for the Watchlist:
///
/// 1. Titles are non-empty
/// 2. Titles are unique, compared case-insensitively
/// 3. last_episode only moves forward while the entry exists
/// 4. An entry is removed at most once, when its series stops airing

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metadata::SeriesId;
    use crate::domain::watchlist::WatchlistEntry;

    #[test]
    fn test_valid_watchlist() {
        let list = Watchlist::new(vec![
            WatchlistEntry::new("Naruto", SeriesId(20)),
            WatchlistEntry::new("Bleach", SeriesId(269)),
        ]);
        assert!(validate_watchlist(&list).is_ok());
    }

    #[test]
    fn test_duplicate_title_fails() {
        let list = Watchlist::new(vec![
            WatchlistEntry::new("Naruto", SeriesId(20)),
            WatchlistEntry::new("NARUTO ", SeriesId(21)),
        ]);
        assert!(validate_watchlist(&list).is_err());
    }

    #[test]
    fn test_empty_title_fails() {
        let list = Watchlist::new(vec![WatchlistEntry::new("   ", SeriesId(20))]);
        assert!(validate_watchlist(&list).is_err());
    }

    #[test]
    fn test_overlapping_titles_reported() {
        let list = Watchlist::new(vec![
            WatchlistEntry::new("Naruto", SeriesId(20)),
            WatchlistEntry::new("Bleach", SeriesId(269)),
            WatchlistEntry::new("Naruto Shippuden", SeriesId(1735)),
        ]);
        assert_eq!(
            overlapping_titles(&list),
            vec![("Naruto".to_string(), "Naruto Shippuden".to_string())]
        );
    }
}
