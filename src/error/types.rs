// src/error/types.rs
use crate::domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Metadata lookup failed ({provider}): {message}")]
    Metadata {
        provider: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Scraper failed twice with the same cause ({0}), giving up")]
    CircuitOpen(ScrapeError),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    pub fn metadata(provider: &'static str, message: impl Into<String>) -> Self {
        AppError::Metadata {
            provider,
            message: message.into(),
        }
    }
}

/// Listing/detail page failures, reduced to a comparable cause.
///
/// Two errors are "the same failure" when they compare equal here; request
/// URLs and other volatile details are deliberately not part of the value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed")]
    Connect,

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("could not read response body")]
    Body,

    #[error("unexpected markup: {0}")]
    Markup(String),
}

impl From<&reqwest::Error> for ScrapeError {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout
        } else if let Some(status) = err.status() {
            ScrapeError::Status(status.as_u16())
        } else if err.is_connect() {
            ScrapeError::Connect
        } else {
            ScrapeError::Body
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_causes_compare_by_kind() {
        assert_eq!(ScrapeError::Status(403), ScrapeError::Status(403));
        assert_ne!(ScrapeError::Status(403), ScrapeError::Status(503));
        assert_ne!(ScrapeError::Timeout, ScrapeError::Connect);
    }

    #[test]
    fn test_metadata_error_names_provider() {
        let err = AppError::metadata("Jikan", "status 404");
        assert_eq!(err.to_string(), "Metadata lookup failed (Jikan): status 404");
    }
}
