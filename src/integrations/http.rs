// src/integrations/http.rs
//
// Shared HTTP plumbing: client construction and the user-agent pool.

use rand::seq::SliceRandom;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Build the HTTP client every integration shares.
pub fn build_http_client(timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .build()
        .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))
}

/// User agents rotated across scrape requests.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Pool from the given agents; blank lines are ignored and an empty pool
    /// falls back to a single built-in agent.
    pub fn new(agents: impl IntoIterator<Item = String>) -> Self {
        let agents: Vec<String> = agents
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        if agents.is_empty() {
            Self::default()
        } else {
            Self { agents }
        }
    }

    /// One agent per line. A missing file is not an error.
    pub fn load(path: &Path) -> AppResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(Self::new(raw.lines().map(str::to_string))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "User agent file {} not found, using the built-in agent",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn pick(&self) -> &str {
        self.agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self {
            agents: vec![DEFAULT_USER_AGENT.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pool_falls_back() {
        let pool = UserAgentPool::new(vec!["  ".to_string(), String::new()]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.pick(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_pick_comes_from_pool() {
        let pool = UserAgentPool::new(vec!["agent-a".to_string(), "agent-b".to_string()]);
        for _ in 0..20 {
            assert!(["agent-a", "agent-b"].contains(&pool.pick()));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let pool = UserAgentPool::load(&dir.path().join("nope.txt")).unwrap();
        assert_eq!(pool.pick(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("useragents.txt");
        std::fs::write(&path, "agent-a\n\nagent-b\n").unwrap();
        assert_eq!(UserAgentPool::load(&path).unwrap().len(), 2);
    }
}
