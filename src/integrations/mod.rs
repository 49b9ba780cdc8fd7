// src/integrations/mod.rs
//
// External Integrations Module
//
// One folder per third-party service. Each client implements one or more of
// the traits in `traits`, which are the only types the services layer sees.

pub mod anilist;
pub mod discord;
pub mod gogo;
pub mod http;
pub mod jikan;
pub mod mal;
pub mod traits;

pub use anilist::AniListClient;
pub use discord::DiscordNotifier;
pub use gogo::GogoScraper;
pub use http::{build_http_client, UserAgentPool};
pub use jikan::JikanClient;
pub use mal::MalClient;
pub use traits::{AiringStatusProvider, Notifier, PageScraper, ScheduleProvider, SeriesSearch};
