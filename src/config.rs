// src/config.rs
//
// Process configuration, read from the environment (and `.env`, loaded by
// the binary before this runs).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::integrations::gogo::DEFAULT_LISTING_URL;

const DEFAULT_WATCHLIST_PATH: &str = "series.json";
const DEFAULT_USER_AGENTS_FILE: &str = "useragents.txt";
const DEFAULT_MENTION: &str = "@everyone";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings every command needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub mal_client_id: String,
    pub watchlist_path: PathBuf,
    pub user_agents_file: PathBuf,
    pub listing_url: String,
    pub http_timeout_secs: u64,
}

/// Delivery settings, only read by the polling loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub channel_id: u64,
    pub mention: String,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let http_timeout_secs = match vars.get("HTTP_TIMEOUT_SECS") {
            None => DEFAULT_HTTP_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(AppError::Config(format!(
                        "HTTP_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
                        raw
                    )))
                }
            },
        };

        Ok(Self {
            mal_client_id: vars.required("MAL_CLIENT_ID")?,
            watchlist_path: vars
                .get("WATCHLIST_PATH")
                .unwrap_or_else(|| DEFAULT_WATCHLIST_PATH.to_string())
                .into(),
            user_agents_file: vars
                .get("USER_AGENTS_FILE")
                .unwrap_or_else(|| DEFAULT_USER_AGENTS_FILE.to_string())
                .into(),
            listing_url: vars
                .get("LISTING_URL")
                .unwrap_or_else(|| DEFAULT_LISTING_URL.to_string()),
            http_timeout_secs,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl DiscordConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let channel_id = vars.required("DISCORD_CHANNEL_ID")?;
        let channel_id = channel_id.parse::<u64>().map_err(|_| {
            AppError::Config(format!(
                "DISCORD_CHANNEL_ID must be a numeric channel id, got '{}'",
                channel_id
            ))
        })?;

        Ok(Self {
            bot_token: vars.required("BOT_API_KEY")?,
            channel_id,
            mention: vars
                .get("DISCORD_MENTION")
                .unwrap_or_else(|| DEFAULT_MENTION.to_string()),
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> AppResult<String> {
        self.get(key)
            .ok_or_else(|| AppError::Config(format!("{} is not set", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const DISCORD: [(&str, &str); 2] = [
        ("BOT_API_KEY", "token"),
        ("DISCORD_CHANNEL_ID", "123456789"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup(&[("MAL_CLIENT_ID", "client")])).unwrap();
        assert_eq!(config.mal_client_id, "client");
        assert_eq!(config.watchlist_path, PathBuf::from("series.json"));
        assert_eq!(config.user_agents_file, PathBuf::from("useragents.txt"));
        assert_eq!(config.listing_url, DEFAULT_LISTING_URL);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let pairs = [
            ("MAL_CLIENT_ID", "client"),
            ("WATCHLIST_PATH", "/var/lib/bot/series.json"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ];
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.watchlist_path, PathBuf::from("/var/lib/bot/series.json"));
        assert_eq!(config.http_timeout_secs, 5);
    }

    #[test]
    fn test_operator_commands_need_no_discord_keys() {
        let config = AppConfig::from_lookup(lookup(&[("MAL_CLIENT_ID", "client")]));
        assert!(config.is_ok());
        assert!(DiscordConfig::from_lookup(lookup(&[("MAL_CLIENT_ID", "client")])).is_err());
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("MAL_CLIENT_ID", "   ")])),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let pairs = [("MAL_CLIENT_ID", "client"), ("HTTP_TIMEOUT_SECS", "0")];
        assert!(AppConfig::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_discord_defaults_applied() {
        let config = DiscordConfig::from_lookup(lookup(&DISCORD)).unwrap();
        assert_eq!(config.bot_token, "token");
        assert_eq!(config.channel_id, 123_456_789);
        assert_eq!(config.mention, "@everyone");
    }

    #[test]
    fn test_discord_mention_override() {
        let mut pairs = DISCORD.to_vec();
        pairs.push(("DISCORD_MENTION", "@here"));
        assert_eq!(DiscordConfig::from_lookup(lookup(&pairs)).unwrap().mention, "@here");
    }

    #[test]
    fn test_missing_token_is_reported_by_name() {
        let err = DiscordConfig::from_lookup(lookup(&DISCORD[1..])).unwrap_err();
        assert!(err.to_string().contains("BOT_API_KEY"));
    }

    #[test]
    fn test_non_numeric_channel_id() {
        let mut pairs = DISCORD.to_vec();
        pairs[1] = ("DISCORD_CHANNEL_ID", "general");
        let err = DiscordConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("general"));
    }
}
