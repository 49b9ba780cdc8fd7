// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod announcement;
pub mod episode;
pub mod metadata;
pub mod notification;
pub mod watchlist;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Episode Domain
pub use episode::{parse_episode_token, EpisodeChange, EpisodeMark, EpisodeNumber};

// Watchlist Domain
pub use watchlist::{overlapping_titles, validate_watchlist, Watchlist, WatchlistEntry};

// Scraped announcements (tick-scoped)
pub use announcement::AnnouncementFragment;

// Metadata value objects
pub use metadata::{AiringStatus, FinalEpisode, NextEpisode, SeriesCandidate, SeriesId};

// Notification events
pub use notification::{EndDetection, EpisodeReleased, SeriesEnded};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
