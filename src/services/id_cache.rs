// src/services/id_cache.rs

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::SeriesId;

/// MyAnimeList id → schedule-provider id translations.
///
/// Filled on first successful translation and kept for the life of the
/// process. There is no eviction: the map holds at most one entry per series
/// ever looked up, which is bounded by the watchlist in practice.
#[derive(Debug, Default)]
pub struct IdTranslationCache {
    entries: Mutex<HashMap<SeriesId, u32>>,
}

impl IdTranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SeriesId) -> Option<u32> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id)
            .copied()
    }

    pub fn insert(&self, id: SeriesId, translated: u32) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, translated);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
