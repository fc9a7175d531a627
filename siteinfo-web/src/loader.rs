use async_trait::async_trait;
use siteinfo_common::{FetchConfig, Result, SiteInfoError};
use siteinfo_http::{HttpClient, HttpError};

use crate::document::ParsedDocument;

/// Anything that can hand back the HTML body behind a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_html(&self, url: &str) -> std::result::Result<String, HttpError>;
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_html(&self, url: &str) -> std::result::Result<String, HttpError> {
        Ok(self.get_page(url).await?.body)
    }
}

/// Fetches a page once and parses it, failing soft.
pub struct PageLoader<S = HttpClient> {
    source: S,
}

impl PageLoader<HttpClient> {
    pub fn new(cfg: &FetchConfig) -> Result<Self> {
        let client = HttpClient::new(cfg).map_err(|e| SiteInfoError::Http(e.to_string()))?;
        Ok(Self::with_source(client))
    }
}

impl<S: PageSource> PageLoader<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// GET `url` and parse the body. Any fetch failure is logged and turned
    /// into an empty document, so every field lookup on it comes back empty.
    pub async fn load(&self, url: &str) -> ParsedDocument {
        match self.source.fetch_html(url).await {
            Ok(body) => {
                tracing::debug!(url, body_len = body.len(), "page.loaded");
                ParsedDocument::parse(&body)
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "page.load_failed");
                ParsedDocument::empty()
            }
        }
    }
}
