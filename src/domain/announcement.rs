/// One scraped "episode released" snippet from the listing page.
/// Lives for a single tick; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementFragment {
    pub text: String,
    pub detail_link: String,
}

impl AnnouncementFragment {
    pub fn new(text: impl Into<String>, detail_link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            detail_link: detail_link.into(),
        }
    }

    /// Lowercased, trimmed text with inner whitespace runs collapsed
    pub fn normalized_text(&self) -> String {
        self.text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}
