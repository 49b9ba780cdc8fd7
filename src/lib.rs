// src/lib.rs
// animenotify - new-episode notifier for a curated anime watchlist
//
// Architecture:
// - Domain-centric: matching, episode ordering and watchlist rules live in domain/
// - One writer: the reconciliation loop owns episode progress
// - Persist, then announce: every detected change is saved before it is sent
// - Explicit seams: every external service sits behind a trait in integrations/

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod repositories;

// ============================================================================
// INTEGRATIONS & SERVICES
// ============================================================================

pub mod integrations;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    parse_episode_token,
    validate_watchlist,
    AiringStatus,
    AnnouncementFragment,
    EndDetection,
    EpisodeChange,
    EpisodeMark,
    EpisodeNumber,
    EpisodeReleased,
    FinalEpisode,
    NextEpisode,
    SeriesCandidate,
    SeriesEnded,
    SeriesId,
    Watchlist,
    WatchlistEntry,
};

// ============================================================================
// PUBLIC API - Errors & Config
// ============================================================================

pub use config::{AppConfig, DiscordConfig};
pub use error::{AppError, AppResult, ScrapeError};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{InMemoryWatchlistRepository, JsonWatchlistRepository, WatchlistRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    IdTranslationCache,
    MetadataResolver,
    ProviderChoice,
    ReconcilerConfig,
    ReconciliationService,
    TickReport,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;
pub use application::commands;
