// src/integrations/gogo/client.rs
//
// Listing page scraper for the streaming index.
//
// The markup is treated as an opaque extraction boundary: announcements are
// the `div.name` nodes and their enclosing links, the detail page carries
// the player in an iframe. Parsing is kept in pure functions so it can be
// exercised against saved pages.

use async_trait::async_trait;
use reqwest::{header, Client};
use scraper::{ElementRef, Html, Selector};

use crate::domain::AnnouncementFragment;
use crate::error::{AppResult, ScrapeError};
use crate::integrations::http::UserAgentPool;
use crate::integrations::traits::PageScraper;

pub const DEFAULT_LISTING_URL: &str = "https://gogoplay1.com/";

pub struct GogoScraper {
    http_client: Client,
    listing_url: String,
    user_agents: UserAgentPool,
}

impl GogoScraper {
    pub fn new(http_client: Client, listing_url: impl Into<String>, user_agents: UserAgentPool) -> Self {
        Self {
            http_client,
            listing_url: listing_url.into(),
            user_agents,
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .http_client
            .get(url)
            .header(header::USER_AGENT, self.user_agents.pick())
            .send()
            .await
            .map_err(|e| ScrapeError::from(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        response.text().await.map_err(|_| ScrapeError::Body)
    }
}

#[async_trait]
impl PageScraper for GogoScraper {
    async fn list_announcements(&self) -> AppResult<Vec<AnnouncementFragment>> {
        let html = self.fetch_html(&self.listing_url).await?;
        let fragments = parse_announcements(&html, &self.listing_url)?;
        log::debug!("Scraped {} announcements from {}", fragments.len(), self.listing_url);
        Ok(fragments)
    }

    async fn extract_video_link(&self, detail_link: &str) -> AppResult<String> {
        let html = self.fetch_html(detail_link).await?;
        Ok(parse_video_link(&html)?)
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Markup(e.to_string()))
}

/// Join a site-relative href onto the listing URL.
fn absolute_link(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

/// Announcement fragments from the listing page, in page order.
///
/// A page without a single announcement node is reported as a markup error:
/// an empty listing almost always means the layout changed or the request
/// was served a block page.
pub fn parse_announcements(
    html: &str,
    base_url: &str,
) -> Result<Vec<AnnouncementFragment>, ScrapeError> {
    let document = Html::parse_document(html);
    let name_selector = selector("div.name")?;

    let mut fragments = Vec::new();
    let mut seen_nodes = 0usize;
    for name in document.select(&name_selector) {
        seen_nodes += 1;
        let text = name.text().collect::<String>().trim().to_string();
        let href = name
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| parent.value().attr("href"));

        match href {
            Some(href) if !text.is_empty() => {
                fragments.push(AnnouncementFragment::new(text, absolute_link(base_url, href)));
            }
            _ => log::debug!("Skipping announcement without text or link: '{}'", text),
        }
    }

    if seen_nodes == 0 {
        return Err(ScrapeError::Markup("no announcement nodes on listing page".to_string()));
    }
    Ok(fragments)
}

/// Playable video URL from a detail page: the first iframe's `src`,
/// normalized to an absolute https URL.
pub fn parse_video_link(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let iframe_selector = selector("iframe")?;

    let src = document
        .select(&iframe_selector)
        .find_map(|iframe| iframe.value().attr("src"))
        .ok_or_else(|| ScrapeError::Markup("detail page has no video iframe".to_string()))?;

    let src = src
        .trim()
        .trim_start_matches("https:")
        .trim_start_matches("http:")
        .trim_start_matches('/');
    Ok(format!("https://{}", src))
}
