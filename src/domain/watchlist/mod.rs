pub mod entity;
pub mod invariants;

pub use entity::{Watchlist, WatchlistEntry};
pub use invariants::{overlapping_titles, validate_watchlist};
