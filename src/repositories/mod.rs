// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic beyond document validation
// - NO notifications
// - Whole-document load/save only

pub mod watchlist_repository;

pub use watchlist_repository::{
    InMemoryWatchlistRepository, JsonWatchlistRepository, StoreGuard, WatchlistRepository,
};
