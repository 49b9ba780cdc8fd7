pub mod client;

pub use client::DiscordNotifier;
