// src/application/commands/watchlist_commands.rs
//
// Watchlist Command Handlers
//
// RULES:
// - Return plain messages, never internal errors
// - Hold the store lock across every load → save
// - Never touch episode progress (the reconciliation loop owns it)

use crate::application::dto::TrackedSeriesDto;
use crate::application::error_handling::ToOperatorMessage;
use crate::application::state::AppState;
use crate::domain::{overlapping_titles, NextEpisode, SeriesCandidate, WatchlistEntry};
use crate::error::AppResult;

/// Search for series matching the query
pub async fn search_series(state: &AppState, query: &str) -> Result<Vec<SeriesCandidate>, String> {
    log::info!("Querying for '{}'", query);
    let candidates = state.search.search(query).await.to_operator_message()?;
    if candidates.is_empty() {
        return Err(format!("No anime found for '{}'", query));
    }

    let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
    log::info!("Choices are: '{}'", titles.join(", "));
    Ok(candidates)
}

/// Pick a 1-based choice out of the search results
pub fn pick_candidate(candidates: &[SeriesCandidate], choice: usize) -> Result<SeriesCandidate, String> {
    choice
        .checked_sub(1)
        .and_then(|index| candidates.get(index))
        .cloned()
        .ok_or_else(|| format!("Pick a number between 1 and {}", candidates.len()))
}

/// Start tracking a series
pub fn add_series(state: &AppState, candidate: SeriesCandidate) -> Result<String, String> {
    add_entry(state, candidate).to_operator_message()
}

fn add_entry(state: &AppState, candidate: SeriesCandidate) -> AppResult<String> {
    let _guard = state.watchlist_repo.lock()?;
    let mut watchlist = state.watchlist_repo.load()?;

    if watchlist.position_by_title(&candidate.title).is_some() {
        log::info!("{} is already in the list", candidate.title);
        return Ok(format!("{} is already in the list", candidate.title));
    }

    watchlist.add(WatchlistEntry::new(candidate.title.clone(), candidate.id))?;
    state.watchlist_repo.save(&watchlist)?;
    log::info!("Added '{}' to the list", candidate.title);

    let mut message = format!("Added {} to the list", candidate.title);
    for (first, second) in overlapping_titles(&watchlist) {
        if first == candidate.title || second == candidate.title {
            log::warn!("'{}' and '{}' overlap", first, second);
            message.push_str(&format!(
                "\nNote: '{}' and '{}' overlap; announcements go to the one listed first.",
                first, second
            ));
        }
    }
    Ok(message)
}

/// Stop tracking a series
pub fn remove_series(state: &AppState, title: &str) -> Result<String, String> {
    remove_entry(state, title).to_operator_message()
}

fn remove_entry(state: &AppState, title: &str) -> AppResult<String> {
    let _guard = state.watchlist_repo.lock()?;
    let mut watchlist = state.watchlist_repo.load()?;

    match watchlist.remove_by_title(title) {
        Some(removed) => {
            state.watchlist_repo.save(&watchlist)?;
            log::info!("Removed '{}' from the list", removed.title);
            Ok(format!("Removed {} from the list", removed.title))
        }
        None => {
            log::info!("{} is not in the list", title);
            Ok(format!("{} is not in the list", title))
        }
    }
}

/// Tracked series, soonest next episode first
pub async fn list_series(state: &AppState) -> Result<String, String> {
    list_entries(state).await.to_operator_message()
}

async fn list_entries(state: &AppState) -> AppResult<String> {
    let watchlist = {
        let _guard = state.watchlist_repo.lock()?;
        state.watchlist_repo.load()?
    };
    if watchlist.is_empty() {
        return Ok("You are not tracking any anime.".to_string());
    }

    let mut rows = Vec::with_capacity(watchlist.len());
    for entry in watchlist.entries() {
        let next = match state.resolver.time_until_next_episode(entry.external_id).await {
            Ok(next) => next,
            Err(e) => {
                log::warn!("No schedule for {}: {}", entry.title, e);
                NextEpisode::null()
            }
        };
        rows.push(TrackedSeriesDto::new(entry, next));
    }
    TrackedSeriesDto::sort_by_next_airing(&mut rows);

    let body: Vec<String> = rows.iter().map(|row| row.to_string()).collect();
    Ok(format!("Currently Tracking Anime\n\n{}", body.join("\n\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::{EpisodeMark, SeriesId, Watchlist};
    use crate::error::AppError;
    use crate::integrations::traits::{
        MockAiringStatusProvider, MockScheduleProvider, MockSeriesSearch,
    };
    use crate::repositories::InMemoryWatchlistRepository;
    use crate::services::{IdTranslationCache, MetadataResolver};

    fn candidate(id: u32, title: &str) -> SeriesCandidate {
        SeriesCandidate {
            id: SeriesId(id),
            title: title.to_string(),
        }
    }

    fn state_with(
        repo: Arc<InMemoryWatchlistRepository>,
        search: MockSeriesSearch,
        schedule: MockScheduleProvider,
    ) -> AppState {
        let resolver = MetadataResolver::new(
            Arc::new(MockAiringStatusProvider::new()),
            Arc::new(MockAiringStatusProvider::new()),
            Arc::new(schedule),
            Arc::new(IdTranslationCache::new()),
        );
        AppState {
            watchlist_repo: repo,
            search: Arc::new(search),
            resolver: Arc::new(resolver),
        }
    }

    fn empty_repo() -> Arc<InMemoryWatchlistRepository> {
        Arc::new(InMemoryWatchlistRepository::new(Watchlist::default()))
    }

    #[tokio::test]
    async fn test_search_returns_candidates() {
        let mut search = MockSeriesSearch::new();
        search
            .expect_search()
            .returning(|_| Ok(vec![candidate(20, "Naruto"), candidate(1735, "Naruto: Shippuuden")]));
        let state = state_with(empty_repo(), search, MockScheduleProvider::new());

        let found = search_series(&state, "naruto").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(pick_candidate(&found, 2).unwrap().id, SeriesId(1735));
        assert!(pick_candidate(&found, 0).is_err());
        assert!(pick_candidate(&found, 3).is_err());
    }

    #[tokio::test]
    async fn test_search_without_results() {
        let mut search = MockSeriesSearch::new();
        search.expect_search().returning(|_| Ok(vec![]));
        let state = state_with(empty_repo(), search, MockScheduleProvider::new());

        assert_eq!(
            search_series(&state, "zzz").await.unwrap_err(),
            "No anime found for 'zzz'"
        );
    }

    #[test]
    fn test_add_then_add_again() {
        let repo = empty_repo();
        let state = state_with(repo.clone(), MockSeriesSearch::new(), MockScheduleProvider::new());

        assert_eq!(
            add_series(&state, candidate(20, "Naruto")).unwrap(),
            "Added Naruto to the list"
        );
        assert_eq!(
            add_series(&state, candidate(20, "naruto")).unwrap(),
            "naruto is already in the list"
        );

        let saved = repo.snapshot();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved.entries()[0].last_episode, EpisodeMark::NotYetAired);
        assert_eq!(repo.save_count(), 1);
    }

    #[test]
    fn test_add_warns_about_overlap() {
        let repo = empty_repo();
        let state = state_with(repo, MockSeriesSearch::new(), MockScheduleProvider::new());

        add_series(&state, candidate(20, "Naruto")).unwrap();
        let message = add_series(&state, candidate(1735, "Naruto Shippuden")).unwrap();
        assert!(message.starts_with("Added Naruto Shippuden to the list"));
        assert!(message.contains("overlap"));
    }

    #[test]
    fn test_remove() {
        let repo = Arc::new(InMemoryWatchlistRepository::new(Watchlist::new(vec![
            WatchlistEntry::new("Naruto", SeriesId(20)),
            WatchlistEntry::new("Bleach", SeriesId(269)),
        ])));
        let state = state_with(repo.clone(), MockSeriesSearch::new(), MockScheduleProvider::new());

        assert_eq!(remove_series(&state, "BLEACH").unwrap(), "Removed Bleach from the list");
        assert_eq!(remove_series(&state, "Bleach").unwrap(), "Bleach is not in the list");
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[test]
    fn test_store_failure_is_a_plain_message() {
        let repo = empty_repo();
        repo.fail_saves(true);
        let state = state_with(repo, MockSeriesSearch::new(), MockScheduleProvider::new());

        let message = add_series(&state, candidate(20, "Naruto")).unwrap_err();
        assert_eq!(message, "Could not read or write the watchlist, please try again.");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let state = state_with(empty_repo(), MockSeriesSearch::new(), MockScheduleProvider::new());
        assert_eq!(list_series(&state).await.unwrap(), "You are not tracking any anime.");
    }

    #[tokio::test]
    async fn test_list_sorted_by_next_airing() {
        let repo = Arc::new(InMemoryWatchlistRepository::new(Watchlist::new(vec![
            WatchlistEntry::new("Naruto", SeriesId(20)),
            WatchlistEntry::new("Bleach", SeriesId(269)),
            WatchlistEntry::new("One Piece", SeriesId(21)),
        ])));
        let mut schedule = MockScheduleProvider::new();
        schedule.expect_translate_id().returning(|id| match id.0 {
            269 => Err(AppError::metadata("AniList", "Not Found.")),
            other => Ok(other + 100),
        });
        schedule.expect_time_until_next_episode().returning(|schedule_id| {
            Ok(match schedule_id {
                120 => NextEpisode::from_seconds(7_200),
                _ => NextEpisode::from_seconds(45),
            })
        });
        let state = state_with(repo, MockSeriesSearch::new(), schedule);

        let listing = list_series(&state).await.unwrap();
        let one_piece = listing.find("One Piece").unwrap();
        let naruto = listing.find("Naruto").unwrap();
        let bleach = listing.find("Bleach").unwrap();
        assert!(one_piece < naruto && naruto < bleach);
        assert!(listing.contains("Airing in 45 seconds"));
        assert!(listing.contains("Airing in 2 hours and 0 minutes"));
        assert!(listing.contains("Airing in N/A"));
    }
}
