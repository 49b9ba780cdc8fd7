// src/application/state.rs

use std::sync::Arc;

use crate::integrations::SeriesSearch;
use crate::repositories::WatchlistRepository;
use crate::services::MetadataResolver;

/// Collaborators shared by the operator commands.
/// Built once in main.rs.
pub struct AppState {
    pub watchlist_repo: Arc<dyn WatchlistRepository>,
    pub search: Arc<dyn SeriesSearch>,
    pub resolver: Arc<MetadataResolver>,
}
