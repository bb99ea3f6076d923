use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("render service failed for {url}: {reason}")]
    Render { url: String, reason: String },
}

impl ScraperError {
    /// Returns `true` when the failure only affects the item being fetched and
    /// the run should log it and move on.
    ///
    /// Malformed JSON and invalid URLs or selectors are not skippable.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_)
                | ScraperError::NotFound { .. }
                | ScraperError::UnexpectedStatus { .. }
                | ScraperError::Render { .. }
        )
    }
}
