pub mod client;

pub use client::{GogoScraper, DEFAULT_LISTING_URL};
